//! Operation-level errors surfaced by the session controller.

use thiserror::Error;

use crate::error::CareError;

/// Minimum password length accepted by `register`.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A local input check failed; no request was sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("unknown upload kind '{0}' (expected image or document)")]
    UnknownUploadKind(String),
}

/// Failure of a session controller operation.
///
/// Every variant maps to a distinct user-visible message via
/// [`SessionError::user_message`]; none of them is fatal.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The server answered an auth request with a non-2xx status.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    #[error("chat unavailable: {0}")]
    ChatUnavailable(String),

    /// Refused locally (too large, or a token is required).
    #[error("upload rejected: {0}")]
    UploadRejected(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    /// The request could not complete (connect failure or timeout).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("session storage failed: {0}")]
    Storage(#[from] CareError),
}

impl SessionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_))
    }

    /// Text shown inline next to the form or in the transcript.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::EmptyField(_)) => {
                "Please fill in all fields".to_string()
            }
            Self::Validation(ValidationError::PasswordTooShort { min }) => {
                format!("Password must be at least {min} characters")
            }
            Self::Validation(ValidationError::UnknownUploadKind(_)) => {
                "Choose an image or a document to upload".to_string()
            }
            Self::AuthRejected(message) => message.clone(),
            Self::ChatUnavailable(_) => {
                "The assistant could not answer right now. Please try again.".to_string()
            }
            Self::UploadRejected(message) => message.clone(),
            Self::UploadFailed(_) => "Failed to upload file. Please try again.".to_string(),
            Self::NetworkUnavailable(_) => "Server not reachable".to_string(),
            Self::Storage(err) if err.is_serialization() => {
                "Saved session data on this device is unreadable".to_string()
            }
            Self::Storage(_) => "Could not save your session on this device".to_string(),
        }
    }
}
