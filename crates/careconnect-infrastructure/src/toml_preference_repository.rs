//! Preferences stored in `preferences.toml`.

use careconnect_core::error::Result;
use careconnect_core::preferences::{PreferenceRepository, Preferences};
use std::path::PathBuf;
use tracing::warn;

use crate::storage::AtomicTomlFile;

pub struct TomlPreferenceRepository {
    file: AtomicTomlFile<Preferences>,
}

impl TomlPreferenceRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

impl PreferenceRepository for TomlPreferenceRepository {
    /// Unreadable files fall back to defaults.
    fn load(&self) -> Result<Preferences> {
        match self.file.load() {
            Ok(prefs) => Ok(prefs.unwrap_or_default()),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable preferences file");
                Ok(Preferences::default())
            }
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        self.file.save(preferences)?;
        Ok(())
    }
}
