//! Path management for CareConnect files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/careconnect/       # Config directory (dirs::config_dir)
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Durable ("remember me") session, mode 600
//! ├── preferences.toml         # Language and theme
//! └── logs/
//!     └── careconnect.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "careconnect";

#[derive(Error, Debug)]
pub enum PathError {
    #[error("cannot determine the user configuration directory")]
    ConfigDirNotFound,
}

/// Resolves every file location from one root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareConnectPaths {
    root: PathBuf,
}

impl CareConnectPaths {
    /// Uses the platform configuration directory (XDG on Linux).
    pub fn from_system() -> Result<Self, PathError> {
        let base = dirs::config_dir().ok_or(PathError::ConfigDirNotFound)?;
        Ok(Self::with_root(base.join(APP_DIR_NAME)))
    }

    /// Uses `root` directly; for tests and `--config-dir`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.toml")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.root.join("preferences.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_root_ends_with_app_dir() {
        if let Ok(paths) = CareConnectPaths::from_system() {
            assert!(paths.root().ends_with("careconnect"));
        }
    }

    #[test]
    fn test_files_live_under_root() {
        let paths = CareConnectPaths::with_root("/tmp/cc");
        for file in [
            paths.config_file(),
            paths.session_file(),
            paths.preferences_file(),
            paths.logs_dir(),
        ] {
            assert!(file.starts_with("/tmp/cc"));
        }
        assert!(paths.session_file().ends_with("session.toml"));
    }
}
