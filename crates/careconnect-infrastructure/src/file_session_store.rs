//! File-backed durable session store.
//!
//! All keys live in one TOML table in `session.toml`. The file is rewritten
//! atomically on every change and removed entirely on `clear`.

use careconnect_core::error::Result;
use careconnect_core::session::{SessionStore, StoreKey};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use crate::storage::AtomicTomlFile;

type SessionTable = BTreeMap<String, String>;

pub struct FileSessionStore {
    file: AtomicTomlFile<SessionTable>,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path).private(),
        }
    }

    fn table(&self) -> Result<SessionTable> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        Ok(self.table()?.remove(key.as_str()))
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        self.file.update(SessionTable::new(), |table| {
            table.insert(key.as_str().to_string(), value.to_string());
        })?;
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        self.file.update(SessionTable::new(), |table| {
            table.remove(key.as_str());
        })?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        debug!(path = %self.file.path().display(), "clearing durable session");
        self.file.remove()?;
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.table()?.is_empty())
    }

    fn replace(&self, entries: &[(StoreKey, &str)]) -> Result<()> {
        let table: SessionTable = entries
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value.to_string()))
            .collect();
        self.file.overwrite(&table)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("session.toml"))
    }

    #[test]
    fn test_values_survive_a_new_handle() {
        let dir = TempDir::new().unwrap();
        store_in(&dir).set(StoreKey::AuthToken, "tok-1").unwrap();

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.get(StoreKey::AuthToken).unwrap().as_deref(),
            Some("tok-1")
        );
    }

    #[test]
    fn test_replace_writes_exact_key_set() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(StoreKey::IsGuest, "true").unwrap();

        store
            .replace(&[
                (StoreKey::User, r#"{"id":"1","name":"A","email":"a@b.c"}"#),
                (StoreKey::AuthToken, "tok"),
            ])
            .unwrap();

        assert!(store.get(StoreKey::IsGuest).unwrap().is_none());
        let raw = std::fs::read_to_string(dir.path().join("session.toml")).unwrap();
        assert!(raw.contains("authToken"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(StoreKey::User, "{}").unwrap();

        store.clear().unwrap();

        assert!(store.is_empty().unwrap());
        assert!(!dir.path().join("session.toml").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.toml"), "user = ").unwrap();

        assert!(store_in(&dir).get(StoreKey::User).is_err());
    }

    #[test]
    fn test_replace_recovers_a_corrupt_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.toml"), "user = ").unwrap();
        let store = store_in(&dir);

        store.replace(&[(StoreKey::AuthToken, "tok")]).unwrap();

        assert_eq!(store.get(StoreKey::AuthToken).unwrap().as_deref(), Some("tok"));
        assert!(store.get(StoreKey::User).unwrap().is_none());
    }
}
