//! Configuration service.
//!
//! Loads [`ClientConfig`] from `config.toml`, writing the defaults on first
//! run, and applies the `CARECONNECT_API_URL` environment override.

use careconnect_core::config::ClientConfig;
use careconnect_core::error::{CareError, Result};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::storage::AtomicTomlFile;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "CARECONNECT_API_URL";

/// Loads and caches the client configuration.
#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the cached configuration, loading it on first access.
    /// A broken file falls back to defaults.
    pub fn get_config(&self) -> ClientConfig {
        if let Some(cached) = self.config.read().as_ref() {
            return cached.clone();
        }

        let loaded = self.load().unwrap_or_else(|err| {
            if err.is_config() {
                warn!(path = %self.path.display(), error = %err, "rejected configuration value, using defaults");
            } else {
                warn!(path = %self.path.display(), error = %err, "unreadable configuration file, using defaults");
            }
            apply_env_override(ClientConfig::default(), std::env::var(API_URL_ENV).ok())
        });
        *self.config.write() = Some(loaded.clone());
        loaded
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write() = None;
    }

    /// Reads the file without touching the cache.
    pub fn load(&self) -> Result<ClientConfig> {
        let file = AtomicTomlFile::<ClientConfig>::new(self.path.clone());
        let config = match file.load()? {
            Some(config) => config,
            None => {
                let config = ClientConfig::default();
                file.save(&config)?;
                info!(path = %self.path.display(), "wrote default configuration");
                config
            }
        };
        validate(&config)?;
        Ok(apply_env_override(config, std::env::var(API_URL_ENV).ok()))
    }
}

fn validate(config: &ClientConfig) -> Result<()> {
    if config.api_base_url.trim().is_empty() {
        return Err(CareError::config("api_base_url must not be empty"));
    }
    if config.request_timeout_secs == 0 {
        return Err(CareError::config("request_timeout_secs must be positive"));
    }
    Ok(())
}

fn apply_env_override(mut config: ClientConfig, api_url: Option<String>) -> ClientConfig {
    if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use careconnect_core::config::DEFAULT_API_BASE_URL;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let service = ConfigService::new(path.clone());

        let config = service.load().unwrap();

        assert_eq!(config.request_timeout_secs, 30);
        assert!(path.exists());
    }

    #[test]
    fn test_file_values_are_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 5\nupload_requires_token = true\n").unwrap();

        let config = ConfigService::new(path).load().unwrap();

        assert_eq!(config.request_timeout_secs, 5);
        assert!(config.upload_requires_token);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 0\n").unwrap();

        let err = ConfigService::new(path.clone()).load().unwrap_err();
        assert!(err.is_config());

        let fallback = ConfigService::new(path).get_config();
        assert_eq!(fallback.request_timeout_secs, 30);
    }

    #[test]
    fn test_env_override() {
        let config = apply_env_override(ClientConfig::default(), Some(" http://10.0.0.2:5000 ".into()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:5000");

        let untouched = apply_env_override(ClientConfig::default(), Some("  ".into()));
        assert_eq!(untouched.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_cache_invalidation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let service = ConfigService::new(path.clone());
        assert!(!service.get_config().demo_mode);

        std::fs::write(&path, "demo_mode = true\n").unwrap();
        assert!(!service.get_config().demo_mode);

        service.invalidate_cache();
        assert!(service.get_config().demo_mode);
    }
}
