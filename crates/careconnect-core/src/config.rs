//! Client configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing or partial file is fine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend location (the Flask backend listens on port 5000).
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Requests that have not completed after this long count as unreachable.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Largest file accepted by `upload_file` (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend, without the `/api` suffix.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// When true, uploads are refused locally unless the session is authenticated.
    pub upload_requires_token: bool,
    pub max_upload_bytes: u64,
    /// Use the offline keyword responder instead of the HTTP backend.
    pub demo_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            upload_requires_token: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            demo_mode: false,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL with any trailing slash removed.
    pub fn normalized_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
