//! Key-value session persistence.
//!
//! Two scopes exist: a durable store (file-backed, see the infrastructure
//! crate) and a volatile store that lives as long as the process.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::Result;

/// Keys written by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Serialized `{id, name, email, isGuest?}`.
    User,
    /// Opaque bearer token, empty string if the server sent none.
    AuthToken,
    /// `"true"` while a guest session is active.
    IsGuest,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::User, StoreKey::AuthToken, StoreKey::IsGuest];

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::User => "user",
            StoreKey::AuthToken => "authToken",
            StoreKey::IsGuest => "isGuest",
        }
    }
}

/// Storage for one persistence scope.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: StoreKey) -> Result<Option<String>>;

    fn set(&self, key: StoreKey, value: &str) -> Result<()>;

    fn remove(&self, key: StoreKey) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    fn is_empty(&self) -> Result<bool>;

    /// Replaces the whole contents with `entries`.
    ///
    /// Implementations backed by files should override this so readers never
    /// observe a half-written session.
    fn replace(&self, entries: &[(StoreKey, &str)]) -> Result<()> {
        self.clear()?;
        for (key, value) in entries {
            self.set(*key, value)?;
        }
        Ok(())
    }
}

/// In-process store; the volatile scope.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<&'static str, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        Ok(self.entries.read().get(key.as_str()).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        self.entries.write().insert(key.as_str(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        self.entries.write().remove(key.as_str());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.entries.read().is_empty())
    }

    fn replace(&self, entries: &[(StoreKey, &str)]) -> Result<()> {
        let mut guard = self.entries.write();
        guard.clear();
        for (key, value) in entries {
            guard.insert(key.as_str(), value.to_string());
        }
        Ok(())
    }
}
