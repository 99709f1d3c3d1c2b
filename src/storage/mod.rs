//! Key-value persistence
//!
//! Bookings and the login flag live in named string slots. The core only
//! depends on [`KeyValueStore`]; [`FileStore`] keeps one file per slot in the
//! data directory (~/.local/share/ride-ease/) and [`MemoryStore`] backs tests
//! and throwaway sessions.

use crate::config::Config;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Named string slots
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read a slot; `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a slot; missing slots are fine
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per slot under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the configured data directory
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Storage(format!("Invalid slot name: {}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Storage(format!("Failed to create data directory: {}", e))
        })?;

        // write-then-rename so a crash never leaves a half written slot
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// In-process store; clones share the same slots
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("data"));

        assert_eq!(store.get("bookings").unwrap(), None);

        store.set("bookings", "[]").unwrap();
        assert_eq!(store.get("bookings").unwrap(), Some("[]".to_string()));

        store.set("bookings", "[1]").unwrap();
        assert_eq!(store.get("bookings").unwrap(), Some("[1]".to_string()));
    }

    #[test]
    fn test_file_store_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("authenticated", "true").unwrap();
        store.remove("authenticated").unwrap();
        assert_eq!(store.get("authenticated").unwrap(), None);

        // removing again is not an error
        store.remove("authenticated").unwrap();
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(matches!(store.set("../escape", "x"), Err(Error::Storage(_))));
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_memory_store_clones_share_slots() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("user_email", "rider@rideease.app").unwrap();
        assert_eq!(
            other.get("user_email").unwrap(),
            Some("rider@rideease.app".to_string())
        );

        other.remove("user_email").unwrap();
        assert_eq!(store.get("user_email").unwrap(), None);
    }
}
