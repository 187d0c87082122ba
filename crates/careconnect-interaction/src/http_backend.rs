//! HttpBackend - REST client for the CareConnect backend.
//!
//! Talks to `/api/auth/login`, `/api/auth/register`, `/api/chat`,
//! `/api/upload` and `/health` under a configurable base URL.

use async_trait::async_trait;
use careconnect_core::backend::{
    BackendApi, BackendError, ChatRequest, ChatResponse, ErrorBody, HealthStatus, LoginRequest,
    LoginResponse, RegisterRequest, UploadRequest, UploadResponse,
};
use careconnect_core::config::ClientConfig;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Backend reached over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// `base_url` is the server root, without the `/api` suffix.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::InvalidRequest(format!("failed to build HTTP client: {err}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, BackendError> {
        Self::new(config.normalized_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|err| map_transport_error(err, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }
        Ok(response)
    }

    async fn read_body(&self, response: Response) -> Result<Vec<u8>, BackendError> {
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|err| map_transport_error(err, self.timeout))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        let bytes = self.read_body(response).await?;
        decode(path, &bytes)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        self.post_json("/api/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, BackendError> {
        debug!(path = "/api/auth/register", "POST");
        let response = self
            .send(self.client.post(self.url("/api/auth/register")).json(request))
            .await?;
        let bytes = self.read_body(response).await?;
        // Success bodies vary between backends; anything counts.
        Ok(serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.post_json("/api/chat", request).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError> {
        let UploadRequest {
            file,
            session_id,
            kind,
            token,
        } = request;

        let content_type = file.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&file.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });
        let part = Part::bytes(file.data)
            .file_name(file.file_name)
            .mime_str(&content_type)
            .map_err(|err| BackendError::InvalidRequest(format!("bad content type '{content_type}': {err}")))?;
        let form = Form::new()
            .part("file", part)
            .text("sessionId", session_id)
            .text("type", kind.to_string());

        let mut builder = self.client.post(self.url("/api/upload")).multipart(form);
        if let Some(token) = token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        debug!(path = "/api/upload", %kind, "POST multipart");
        let response = self.send(builder).await?;
        let bytes = self.read_body(response).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(UploadResponse::default());
        }
        decode("/api/upload", &bytes)
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        debug!(path = "/health", "GET");
        let response = self.send(self.client.get(self.url("/health"))).await?;
        let bytes = self.read_body(response).await?;
        decode("/health", &bytes)
    }
}

fn decode<R: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<R, BackendError> {
    serde_json::from_slice(bytes)
        .map_err(|err| BackendError::InvalidResponse(format!("{path}: {err}")))
}

fn map_transport_error(err: reqwest::Error, timeout: Duration) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(timeout)
    } else {
        BackendError::Unreachable(err.to_string())
    }
}

/// Non-2xx: pull `error`, then `message`, out of a JSON body if there is one.
fn map_http_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message);
    BackendError::rejected(status.as_u16(), message)
}
