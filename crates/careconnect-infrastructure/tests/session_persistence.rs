use async_trait::async_trait;
use careconnect_core::backend::{
    BackendApi, BackendError, ChatRequest, ChatResponse, HealthStatus, LoginRequest,
    LoginResponse, RegisterRequest, UploadRequest, UploadResponse,
};
use careconnect_core::session::{
    ControllerSettings, MemorySessionStore, PersistenceScope, SessionController, SessionStore,
    StoreKey, User,
};
use careconnect_infrastructure::FileSessionStore;
use std::sync::Arc;
use tempfile::TempDir;

// Backend that accepts every login
struct AcceptingBackend;

#[async_trait]
impl BackendApi for AcceptingBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        Ok(LoginResponse {
            user: User::new("42", "Asha", request.email.clone()),
            token: "tok-file".to_string(),
            session_id: None,
        })
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<serde_json::Value, BackendError> {
        Ok(serde_json::Value::Null)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        Ok(ChatResponse::text(format!("echo: {}", request.message)))
    }

    async fn upload(&self, _request: UploadRequest) -> Result<UploadResponse, BackendError> {
        Ok(UploadResponse::default())
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            message: None,
            version: None,
        })
    }
}

fn controller_over(dir: &TempDir, volatile: Arc<MemorySessionStore>) -> SessionController {
    SessionController::new(
        Arc::new(AcceptingBackend),
        Arc::new(FileSessionStore::new(dir.path().join("session.toml"))),
        volatile,
        ControllerSettings::default(),
    )
}

#[tokio::test]
async fn test_remembered_login_overwrites_corrupt_session_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("session.toml"), "user = ").unwrap();
    let volatile = Arc::new(MemorySessionStore::new());
    let controller = controller_over(&dir, volatile.clone());

    assert!(controller.initialize().is_anonymous());
    controller
        .login("asha@example.com", "secret1", true)
        .await
        .unwrap();

    assert!(controller.identity().is_authenticated());
    assert_eq!(controller.persistence_scope(), PersistenceScope::Durable);
    assert!(volatile.is_empty().unwrap());

    let reopened = FileSessionStore::new(dir.path().join("session.toml"));
    assert_eq!(
        reopened.get(StoreKey::AuthToken).unwrap().as_deref(),
        Some("tok-file")
    );
}

#[tokio::test]
async fn test_remembered_login_survives_restart() {
    let dir = TempDir::new().unwrap();
    let first = controller_over(&dir, Arc::new(MemorySessionStore::new()));
    first.initialize();
    first.login("asha@example.com", "secret1", true).await.unwrap();

    let restarted = controller_over(&dir, Arc::new(MemorySessionStore::new()));
    let identity = restarted.initialize();

    assert_eq!(identity.token(), Some("tok-file"));
    assert_eq!(restarted.current_user().unwrap().name, "Asha");

    restarted.logout().unwrap();
    assert!(!dir.path().join("session.toml").exists());
}
