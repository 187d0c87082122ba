//! Backend API contract.
//!
//! The session controller talks to the backend only through [`BackendApi`];
//! the HTTP and offline demo implementations live in `careconnect-interaction`.

mod model;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use model::{
    ChatRequest, ChatResponse, ErrorBody, HealthStatus, LoginRequest, LoginResponse,
    NO_REPLY_TEXT, RegisterRequest, UploadFile, UploadKind, UploadRequest, UploadResponse,
};

/// Transport-level outcome of a backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Non-2xx response. `message` is the server-supplied `error`/`message`, if any.
    #[error("server responded with status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected { status: u16, message: Option<String> },

    /// Could not reach the server.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be built locally.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 2xx response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// 401/403: the stored credentials are no longer accepted.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }

    /// The request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Timeout(_))
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// The four endpoints the client depends on, plus a health check.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError>;

    /// Success bodies are implementation-defined.
    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, BackendError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;

    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError>;

    async fn health(&self) -> Result<HealthStatus, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_detection() {
        assert!(BackendError::rejected(401, None).is_auth_failure());
        assert!(BackendError::rejected(403, None).is_auth_failure());
        assert!(!BackendError::rejected(500, None).is_auth_failure());
        assert!(!BackendError::Unreachable("refused".into()).is_auth_failure());
    }

    #[test]
    fn test_rejected_display_includes_server_message() {
        let err = BackendError::rejected(400, Some("Email already registered".into()));
        assert_eq!(
            err.to_string(),
            "server responded with status 400: Email already registered"
        );
        assert_eq!(
            BackendError::rejected(500, None).to_string(),
            "server responded with status 500"
        );
    }
}
