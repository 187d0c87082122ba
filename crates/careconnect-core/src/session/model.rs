//! Session domain model.
//!
//! A session is exactly one [`Identity`] plus a client-generated
//! [`SessionId`] used to tag chat and upload requests.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Display name given to every guest session.
pub const GUEST_NAME: &str = "Guest User";
/// Placeholder address attached to guest records.
pub const GUEST_EMAIL: &str = "guest@careconnect.app";

/// User record as returned by the backend and persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_guest: bool,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            is_guest: false,
        }
    }

    /// Synthesizes the local guest identity: `guest_<unix-millis>`.
    pub fn guest() -> Self {
        Self {
            id: format!("guest_{}", Utc::now().timestamp_millis()),
            name: GUEST_NAME.to_string(),
            email: GUEST_EMAIL.to_string(),
            is_guest: true,
        }
    }
}

/// Backends disagree on whether ids are strings or integers; accept both.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Int(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}

/// Who is using the app right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Logged in through the backend; `token` may be empty if the server sent none.
    Authenticated { user: User, token: String },
    /// Local-only identity created without backend involvement. Never has a token.
    Guest { user: User },
    Anonymous,
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Authenticated { user, .. } | Identity::Guest { user } => Some(user),
            Identity::Anonymous => None,
        }
    }

    /// Bearer credential, present only for authenticated sessions.
    pub fn token(&self) -> Option<&str> {
        match self {
            Identity::Authenticated { token, .. } if !token.is_empty() => Some(token),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest { .. })
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    /// The synthetic id of a guest session.
    pub fn guest_id(&self) -> Option<&str> {
        match self {
            Identity::Guest { user } => Some(&user.id),
            _ => None,
        }
    }
}

/// Where the session keys live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceScope {
    /// Survives restarts ("remember me").
    Durable,
    /// Lives only as long as the running client.
    Volatile,
}

/// Client-generated correlation id: `session_<unix-millis>_<9 base36 chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl SessionId {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..9)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("session_{}_{}", Utc::now().timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which auth form is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Login,
    Register,
}

/// Top-level navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth(AuthForm),
    Main,
}

/// A success message for the presentation layer to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
