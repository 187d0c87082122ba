//! Errors raised below the session layer.

use thiserror::Error;

/// Failure reading or writing local state: session stores, preference and
/// config files.
///
/// The session controller wraps it as [`crate::session::SessionError::Storage`].
#[derive(Error, Debug, Clone)]
pub enum CareError {
    /// The file system refused a read or write.
    #[error("IO error: {message}")]
    Io { message: String },

    /// A persisted record or config file could not be encoded or decoded.
    #[error("{format} error: {message}")]
    Serialization {
        format: &'static str,
        message: String,
    },

    /// `config.toml` parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A store could not be locked or updated.
    #[error("session store unavailable: {0}")]
    DataAccess(String),
}

impl CareError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// True when stored data exists but cannot be read back.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for CareError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CareError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON",
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CareError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML",
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CareError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML",
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: CareError = io.into();
        assert!(matches!(err, CareError::Io { .. }));
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_corrupt_user_record_is_serialization() {
        let parse = serde_json::from_str::<serde_json::Value>("{ broken").unwrap_err();
        let err: CareError = parse.into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_config_display() {
        let err = CareError::config("request_timeout_secs must be positive");
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "invalid configuration: request_timeout_secs must be positive"
        );
    }
}
