use careconnect_core::backend::{
    BackendApi, BackendError, ChatRequest, LoginRequest, RegisterRequest, UploadFile, UploadKind,
    UploadRequest,
};
use careconnect_core::session::{
    ChatOutcome, ControllerSettings, MemorySessionStore, SessionController, SessionStore, StoreKey,
};
use careconnect_interaction::HttpBackend;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_login_posts_credentials_and_decodes_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "asha@example.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 3, "name": "Asha", "email": "asha@example.com"},
            "token": "jwt-abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .login(&LoginRequest::new("asha@example.com", "secret1"))
        .await
        .unwrap();

    assert_eq!(response.user.id, "3");
    assert_eq!(response.token, "jwt-abc");
    assert!(response.session_id.is_none());
}

#[tokio::test]
async fn test_login_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .login(&LoginRequest::new("a@b.c", "nope"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::rejected(401, Some("Invalid credentials".into()))
    );
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_register_accepts_any_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let request = RegisterRequest {
        name: "Asha".into(),
        email: "asha@example.com".into(),
        password: "secret1".into(),
    };
    let body = backend_for(&server).register(&request).await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn test_chat_sends_session_and_request_ids() {
    let server = MockServer::start().await;
    let request = ChatRequest::new("I have a headache", "session_1_abcdefghi");
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "I have a headache",
            "session_id": "session_1_abcdefghi",
            "request_id": request.request_id.to_string(),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Rest and hydrate."})))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend_for(&server).chat(&request).await.unwrap();
    assert_eq!(response.into_reply(), "Rest and hydrate.");
}

#[tokio::test]
async fn test_upload_is_multipart_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(body_string_contains("name=\"sessionId\""))
        .and(body_string_contains("name=\"type\""))
        .and(body_string_contains("filename=\"report.pdf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"analysis": "Normal ranges."})))
        .expect(1)
        .mount(&server)
        .await;

    let request = UploadRequest {
        file: UploadFile::new("report.pdf", b"%PDF-1.4".to_vec()),
        session_id: "session_1_abcdefghi".into(),
        kind: UploadKind::Document,
        token: Some("jwt-abc".into()),
    };
    let response = backend_for(&server).upload(request).await.unwrap();
    assert_eq!(response.analysis.as_deref(), Some("Normal ranges."));
}

#[tokio::test]
async fn test_upload_without_token_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let request = UploadRequest {
        file: UploadFile::new("rash.jpg", vec![0xff, 0xd8]),
        session_id: "s".into(),
        kind: UploadKind::Image,
        token: None,
    };
    backend_for(&server).upload(request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri(), Duration::from_millis(200)).unwrap();
    let err = backend.health().await.unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, BackendError::Timeout(_)));
}

#[tokio::test]
async fn test_closed_port_is_unreachable() {
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = backend
        .chat(&ChatRequest::new("hi", "s"))
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_controller_over_http_server_error_yields_single_error_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let controller = SessionController::new(
        Arc::new(backend_for(&server)),
        Arc::new(MemorySessionStore::new()),
        Arc::new(MemorySessionStore::new()),
        ControllerSettings::default(),
    );
    controller.initialize();
    controller.guest_access().unwrap();

    let outcome = controller.send_chat_message("hello").await;

    assert!(matches!(outcome, ChatOutcome::Failed(_)));
    let entries = controller.transcript();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "hello");
    assert!(entries[1].is_error());
}

#[tokio::test]
async fn test_controller_login_over_http_persists_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u1", "name": "Asha", "email": "asha@example.com"},
            "token": "jwt-abc",
            "sessionId": "srv-42"
        })))
        .mount(&server)
        .await;

    let durable = Arc::new(MemorySessionStore::new());
    let volatile = Arc::new(MemorySessionStore::new());
    let controller = SessionController::new(
        Arc::new(backend_for(&server)),
        durable.clone(),
        volatile.clone(),
        ControllerSettings::default(),
    );
    controller.initialize();

    controller
        .login("asha@example.com", "secret1", true)
        .await
        .unwrap();

    assert_eq!(
        durable.get(StoreKey::AuthToken).unwrap().as_deref(),
        Some("jwt-abc")
    );
    assert!(volatile.is_empty().unwrap());
    assert_eq!(controller.session_id().as_str(), "srv-42");
}
