//! The session controller: single source of truth for who is using the app.
//!
//! It reconciles the persisted stores with server-issued credentials, gates
//! navigation between the auth view and the main view, and owns the chat
//! transcript. All operations take `&self`; no lock is held across a
//! backend call, so a second chat message may be sent while the first is in
//! flight. Replies are appended in arrival order.
//!
//! Every session switch (initialize, login, guest access, logout, server-side
//! invalidation) starts a new generation. A reply whose request was sent in an
//! earlier generation is dropped instead of being appended.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{
    BackendApi, BackendError, ChatRequest, HealthStatus, LoginRequest, RegisterRequest,
    UploadFile, UploadKind, UploadRequest,
};
use crate::config::{ClientConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::CareError;
use crate::transcript::{Transcript, TranscriptEntry};

use super::error::{MIN_PASSWORD_LEN, SessionError, ValidationError};
use super::model::{AuthForm, Identity, Notice, PersistenceScope, SessionId, User, View};
use super::pending::BusyIndicator;
use super::store::{SessionStore, StoreKey};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const REGISTERED_NOTICE: &str = "Account created! Please login.";
const LOGGED_OUT_NOTICE: &str = "Logged out successfully. See you soon! 👋";

const CHAT_UNREACHABLE_TEXT: &str = "❌ Backend not reachable.";
const CHAT_SERVER_ERROR_TEXT: &str = "❌ The assistant could not answer right now. Please try again.";
const SESSION_EXPIRED_TEXT: &str = "🔒 Your session has expired. Please log in again.";

const UPLOAD_SUCCESS_TEXT: &str = "File uploaded successfully!";
const UPLOAD_FAILED_TEXT: &str = "Failed to upload file. Please try again.";
const UPLOAD_UNREACHABLE_TEXT: &str = "Error uploading file. Please try again.";

/// Knobs the controller takes from [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub max_upload_bytes: u64,
    /// Refuse uploads locally unless authenticated.
    pub upload_requires_token: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_requires_token: false,
        }
    }
}

impl From<&ClientConfig> for ControllerSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            upload_requires_token: config.upload_requires_token,
        }
    }
}

/// Result of [`SessionController::send_chat_message`]. Chat never returns an error.
#[derive(Debug, Clone)]
pub enum ChatOutcome {
    /// Blank input; nothing was appended or sent.
    Ignored,
    /// A bot reply was appended.
    Delivered,
    /// An error entry was appended.
    Failed(SessionError),
    /// The session changed while the request was in flight; the reply was dropped.
    Discarded,
}

impl ChatOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, ChatOutcome::Ignored)
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, ChatOutcome::Delivered)
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, ChatOutcome::Discarded)
    }
}

#[derive(Debug)]
struct SessionState {
    identity: Identity,
    session_id: SessionId,
    scope: PersistenceScope,
    view: View,
    generation: u64,
}

impl SessionState {
    fn anonymous() -> Self {
        Self {
            identity: Identity::Anonymous,
            session_id: SessionId::generate(),
            scope: PersistenceScope::Volatile,
            view: View::Auth(AuthForm::Login),
            generation: 0,
        }
    }

    fn begin(&mut self, session_id: SessionId) {
        self.session_id = session_id;
        self.generation += 1;
    }

    fn reset(&mut self) {
        self.identity = Identity::Anonymous;
        self.scope = PersistenceScope::Volatile;
        self.view = View::Auth(AuthForm::Login);
        self.begin(SessionId::generate());
    }
}

pub struct SessionController {
    backend: Arc<dyn BackendApi>,
    durable: Arc<dyn SessionStore>,
    volatile: Arc<dyn SessionStore>,
    settings: ControllerSettings,
    state: RwLock<SessionState>,
    transcript: Mutex<Transcript>,
    busy: BusyIndicator,
}

impl SessionController {
    /// Creates an Anonymous controller. Call [`initialize`](Self::initialize)
    /// once before anything else to pick up persisted state.
    pub fn new(
        backend: Arc<dyn BackendApi>,
        durable: Arc<dyn SessionStore>,
        volatile: Arc<dyn SessionStore>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            backend,
            durable,
            volatile,
            settings,
            state: RwLock::new(SessionState::anonymous()),
            transcript: Mutex::new(Transcript::new()),
            busy: BusyIndicator::new(),
        }
    }

    // ============================================================================
    // Session lifecycle
    // ============================================================================

    /// Restores the session from local state without touching the network.
    ///
    /// The durable store wins over the volatile one. Staleness of a restored
    /// token is only discovered by the next request that the server rejects.
    pub fn initialize(&self) -> Identity {
        let restored = restore_from(self.durable.as_ref(), PersistenceScope::Durable)
            .or_else(|| restore_from(self.volatile.as_ref(), PersistenceScope::Volatile));

        let mut state = self.state.write();
        state.begin(SessionId::generate());
        match restored {
            Some((identity, scope)) => {
                info!(
                    authenticated = identity.is_authenticated(),
                    guest = identity.is_guest(),
                    ?scope,
                    "restored persisted session"
                );
                state.identity = identity;
                state.scope = scope;
                state.view = View::Main;
            }
            None => {
                debug!("no persisted session, starting anonymous");
                state.identity = Identity::Anonymous;
                state.scope = PersistenceScope::Volatile;
                state.view = View::Auth(AuthForm::Login);
            }
        }
        state.identity.clone()
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<Notice, SessionError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmptyField("email").into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }

        let request = LoginRequest::new(email, password);
        let response = {
            let _pending = self.busy.acquire();
            self.backend.login(&request).await
        }
        .map_err(|err| auth_error(err, LOGIN_FAILED))?;

        let scope = if remember {
            PersistenceScope::Durable
        } else {
            PersistenceScope::Volatile
        };
        let user_json = serde_json::to_string(&response.user).map_err(CareError::from)?;
        self.write_session(
            scope,
            &[
                (StoreKey::User, user_json.as_str()),
                (StoreKey::AuthToken, response.token.as_str()),
            ],
        )?;

        let notice = Notice::new(format!("Welcome back, {}! 👋", response.user.name));
        let mut state = self.state.write();
        info!(user_id = %response.user.id, ?scope, "login succeeded");
        state.begin(
            response
                .session_id
                .filter(|id| !id.is_empty())
                .map(SessionId::from)
                .unwrap_or_else(SessionId::generate),
        );
        state.identity = Identity::Authenticated {
            user: response.user,
            token: response.token,
        };
        state.scope = scope;
        state.view = View::Main;
        Ok(notice)
    }

    /// Creates an account. Does not log in; routes to the login form instead.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Notice, SessionError> {
        let name = name.trim();
        let email = email.trim();
        for (field, value) in [("name", name), ("email", email), ("password", password)] {
            if value.is_empty() {
                return Err(ValidationError::EmptyField(field).into());
            }
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            }
            .into());
        }

        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = {
            let _pending = self.busy.acquire();
            self.backend.register(&request).await
        };
        result.map_err(|err| auth_error(err, REGISTRATION_FAILED))?;

        info!(email = %email, "registration succeeded");
        self.state.write().view = View::Auth(AuthForm::Login);
        Ok(Notice::new(REGISTERED_NOTICE))
    }

    /// Starts a local guest session. Works with the backend unreachable.
    pub fn guest_access(&self) -> Result<Notice, SessionError> {
        let user = User::guest();
        let user_json = serde_json::to_string(&user).map_err(CareError::from)?;
        self.write_session(
            PersistenceScope::Volatile,
            &[(StoreKey::User, user_json.as_str()), (StoreKey::IsGuest, "true")],
        )?;

        info!(guest_id = %user.id, "guest access granted");
        let notice = Notice::new(format!("Welcome, {}!", user.name));
        let mut state = self.state.write();
        state.identity = Identity::Guest { user };
        state.begin(SessionId::generate());
        state.scope = PersistenceScope::Volatile;
        state.view = View::Main;
        Ok(notice)
    }

    /// Clears every persisted field and returns to the auth view.
    ///
    /// In-memory state is reset even when a store fails to clear; the first
    /// store error is reported afterwards.
    pub fn logout(&self) -> Result<Notice, SessionError> {
        let cleared = self.clear_stores();
        {
            let mut state = self.state.write();
            state.reset();
            self.transcript.lock().clear();
        }
        info!("logged out");
        cleared?;
        Ok(Notice::new(LOGGED_OUT_NOTICE))
    }

    /// Switches between the login and register forms while in the auth view.
    pub fn switch_form(&self, form: AuthForm) {
        let mut state = self.state.write();
        if state.view != View::Main {
            state.view = View::Auth(form);
        }
    }

    // ============================================================================
    // Chat & upload
    // ============================================================================

    /// Sends one chat message. Blank input is silently ignored.
    ///
    /// The user entry is appended before the request goes out; the reply or a
    /// locally generated error entry is appended when the request completes.
    pub async fn send_chat_message(&self, text: &str) -> ChatOutcome {
        let message = text.trim();
        if message.is_empty() {
            return ChatOutcome::Ignored;
        }

        let question = TranscriptEntry::user(message);
        let question_id = question.id;
        let (session_id, generation) = {
            let state = self.state.read();
            self.transcript.lock().push(question);
            (state.session_id.clone(), state.generation)
        };

        let request = ChatRequest::new(message, session_id.as_str());
        debug!(request_id = %request.request_id, "sending chat message");
        let result = {
            let _pending = self.busy.acquire();
            self.backend.chat(&request).await
        };

        match result {
            Ok(response) => {
                let reply = TranscriptEntry::bot_reply(response.into_reply(), question_id);
                if !self.push_if_current(generation, reply) {
                    debug!(request_id = %request.request_id, "session changed, dropping chat reply");
                    return ChatOutcome::Discarded;
                }
                ChatOutcome::Delivered
            }
            Err(err) => {
                warn!(request_id = %request.request_id, error = %err, "chat request failed");
                if !self.invalidate_if_rejected(&err, generation, question_id) {
                    let text = if err.is_transport() {
                        CHAT_UNREACHABLE_TEXT
                    } else {
                        CHAT_SERVER_ERROR_TEXT
                    };
                    if !self.push_if_current(generation, TranscriptEntry::bot_error(text, question_id)) {
                        debug!(request_id = %request.request_id, "session changed, dropping chat error");
                        return ChatOutcome::Discarded;
                    }
                }
                let error = if err.is_transport() {
                    SessionError::NetworkUnavailable(err.to_string())
                } else {
                    SessionError::ChatUnavailable(err.to_string())
                };
                ChatOutcome::Failed(error)
            }
        }
    }

    /// Uploads an image or document for analysis.
    ///
    /// Oversized files, and files sent without a token when one is required,
    /// are refused before any request or transcript entry. When the session
    /// changes while the upload is in flight, the result is still returned but
    /// nothing is appended.
    pub async fn upload_file(&self, file: UploadFile, kind: UploadKind) -> Result<(), SessionError> {
        if file.size() > self.settings.max_upload_bytes {
            return Err(SessionError::UploadRejected(format!(
                "File size must be less than {}MB",
                self.settings.max_upload_bytes / (1024 * 1024)
            )));
        }

        let notice = TranscriptEntry::user(format!("📎 Uploading {}...", file.file_name));
        let notice_id = notice.id;
        let (session_id, token, generation) = {
            let state = self.state.read();
            let token = state.identity.token().map(str::to_string);
            if self.settings.upload_requires_token && token.is_none() {
                return Err(SessionError::UploadRejected(
                    "Please log in to upload files".to_string(),
                ));
            }
            self.transcript.lock().push(notice);
            (state.session_id.to_string(), token, state.generation)
        };

        let file_name = file.file_name.clone();
        let request = UploadRequest {
            file,
            session_id,
            kind,
            token,
        };
        let result = {
            let _pending = self.busy.acquire();
            self.backend.upload(request).await
        };

        match result {
            Ok(response) => {
                info!(file = %file_name, %kind, "upload analysed");
                let analysis = response
                    .analysis
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| UPLOAD_SUCCESS_TEXT.to_string());
                if !self.push_if_current(generation, TranscriptEntry::bot_reply(analysis, notice_id)) {
                    debug!(file = %file_name, "session changed, dropping upload analysis");
                }
                Ok(())
            }
            Err(err) => {
                warn!(file = %file_name, error = %err, "upload failed");
                if !self.invalidate_if_rejected(&err, generation, notice_id) {
                    let text = if err.is_transport() {
                        UPLOAD_UNREACHABLE_TEXT
                    } else {
                        UPLOAD_FAILED_TEXT
                    };
                    if !self.push_if_current(generation, TranscriptEntry::bot_error(text, notice_id)) {
                        debug!(file = %file_name, "session changed, dropping upload error");
                    }
                }
                Err(if err.is_transport() {
                    SessionError::NetworkUnavailable(err.to_string())
                } else {
                    SessionError::UploadFailed(err.to_string())
                })
            }
        }
    }

    /// Probes `GET /health`.
    pub async fn check_backend(&self) -> Result<HealthStatus, SessionError> {
        let _pending = self.busy.acquire();
        self.backend
            .health()
            .await
            .map_err(|err| SessionError::NetworkUnavailable(err.to_string()))
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn identity(&self) -> Identity {
        self.state.read().identity.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().identity.user().cloned()
    }

    pub fn session_id(&self) -> SessionId {
        self.state.read().session_id.clone()
    }

    pub fn persistence_scope(&self) -> PersistenceScope {
        self.state.read().scope
    }

    pub fn view(&self) -> View {
        self.state.read().view
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().entries().to_vec()
    }

    /// Appends a bot entry produced locally (welcome text, helplines).
    /// Nothing is sent to the backend.
    pub fn append_bot_message(&self, text: impl Into<String>) {
        self.transcript.lock().push(TranscriptEntry::bot(text));
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Receives the number of in-flight backend calls whenever it changes.
    pub fn subscribe_busy(&self) -> watch::Receiver<usize> {
        self.busy.subscribe()
    }

    // ============================================================================
    // Internals
    // ============================================================================

    /// Writes `entries` to the selected scope, then clears the other one.
    fn write_session(
        &self,
        scope: PersistenceScope,
        entries: &[(StoreKey, &str)],
    ) -> Result<(), SessionError> {
        let (target, other) = match scope {
            PersistenceScope::Durable => (&self.durable, &self.volatile),
            PersistenceScope::Volatile => (&self.volatile, &self.durable),
        };
        target.replace(entries)?;
        other.clear()?;
        Ok(())
    }

    fn clear_stores(&self) -> Result<(), SessionError> {
        let durable = self.durable.clear();
        let volatile = self.volatile.clear();
        durable?;
        volatile?;
        Ok(())
    }

    /// Appends `entry` unless the session moved past `generation`.
    fn push_if_current(&self, generation: u64, entry: TranscriptEntry) -> bool {
        let state = self.state.read();
        if state.generation != generation {
            return false;
        }
        self.transcript.lock().push(entry);
        true
    }

    /// Drops the authenticated session of `generation` if the server refused
    /// its credentials, keeping the transcript and appending the expiry
    /// notice as the answer to `reply_to`. Returns whether it did.
    fn invalidate_if_rejected(&self, err: &BackendError, generation: u64, reply_to: Uuid) -> bool {
        if !err.is_auth_failure() {
            return false;
        }
        let mut state = self.state.write();
        if state.generation != generation || !state.identity.is_authenticated() {
            return false;
        }
        warn!("stored credentials rejected by server, clearing session");
        if let Err(store_err) = self.clear_stores() {
            warn!(error = %store_err, "failed to clear stores after rejection");
        }
        state.reset();
        self.transcript
            .lock()
            .push(TranscriptEntry::bot_error(SESSION_EXPIRED_TEXT, reply_to));
        true
    }
}

/// Reads one scope. Corrupt records are treated as absent.
fn restore_from(
    store: &dyn SessionStore,
    scope: PersistenceScope,
) -> Option<(Identity, PersistenceScope)> {
    let raw = match store.get(StoreKey::User) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(?scope, error = %err, "failed to read persisted user");
            return None;
        }
    };
    let mut user: User = match serde_json::from_str(&raw) {
        Ok(user) => user,
        Err(err) => {
            warn!(?scope, error = %err, "ignoring corrupt persisted user record");
            return None;
        }
    };

    let guest_marker = matches!(store.get(StoreKey::IsGuest), Ok(Some(ref v)) if v == "true");
    if user.is_guest || guest_marker {
        user.is_guest = true;
        return Some((Identity::Guest { user }, PersistenceScope::Volatile));
    }

    let token = store.get(StoreKey::AuthToken).ok().flatten().unwrap_or_default();
    Some((Identity::Authenticated { user, token }, scope))
}

fn auth_error(err: BackendError, fallback: &str) -> SessionError {
    match err {
        BackendError::Rejected { message, .. } => {
            SessionError::AuthRejected(message.unwrap_or_else(|| fallback.to_string()))
        }
        BackendError::InvalidResponse(detail) | BackendError::InvalidRequest(detail) => {
            warn!(%detail, "undecodable auth response");
            SessionError::AuthRejected(fallback.to_string())
        }
        other => SessionError::NetworkUnavailable(other.to_string()),
    }
}
