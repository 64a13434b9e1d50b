//! Scoped client-side key-value store.
//!
//! DESIGN
//! ======
//! Remembered command defaults and small per-entity caches live behind
//! [`ScopedStore`]: a namespace (and optional entity id) over a narrow
//! [`KvStore`] backend.
//! Keys render as `homeroom:{namespace}[:{entity}]:{key}` so no two scopes
//! can collide. Values are JSON.
//!
//! Backends are synchronous; both are small enough that blocking I/O is
//! not a concern.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use forms::RecipientType;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const KEY_PREFIX: &str = "homeroom";

/// Values the last command run used (folder, SMS recipient).
pub const NS_LAST_USED: &str = "last_used";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw string storage.
pub trait KvStore: Send + Sync {
    /// # Errors
    ///
    /// Backend failure.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// # Errors
    ///
    /// Backend failure.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// # Errors
    ///
    /// Backend failure.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// BACKENDS
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}

/// A single JSON object file holding every key. Rewritten on each change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), lock: Mutex::new(()) }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// SCOPED ACCESS
// =============================================================================

#[derive(Clone)]
pub struct ScopedStore {
    backend: Arc<dyn KvStore>,
    namespace: String,
    entity: Option<String>,
}

impl ScopedStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KvStore>, namespace: impl Into<String>) -> Self {
        Self { backend, namespace: namespace.into(), entity: None }
    }

    /// Same backend and namespace, narrowed to one entity.
    #[must_use]
    pub fn for_entity(&self, entity: impl Into<String>) -> Self {
        Self { backend: self.backend.clone(), namespace: self.namespace.clone(), entity: Some(entity.into()) }
    }

    /// Fully qualified backend key.
    #[must_use]
    pub fn key(&self, key: &str) -> String {
        match &self.entity {
            Some(entity) => format!("{KEY_PREFIX}:{}:{entity}:{key}", self.namespace),
            None => format!("{KEY_PREFIX}:{}:{key}", self.namespace),
        }
    }

    /// # Errors
    ///
    /// Backend failure or a stored value that does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(&self.key(key))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Backend failure.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.backend.set(&self.key(key), &serde_json::to_string(value)?)
    }

    /// # Errors
    ///
    /// Backend failure.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(&self.key(key))
    }
}

/// Folder and SMS recipient remembered between runs.
///
/// An explicit value is stored and returned; an omitted one falls back to
/// the stored value, then to the default.
pub struct LastUsed {
    scope: ScopedStore,
}

impl LastUsed {
    const FOLDER_KEY: &'static str = "folder";
    const RECIPIENT_KEY: &'static str = "sms_recipient";

    #[must_use]
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self { scope: ScopedStore::new(backend, NS_LAST_USED) }
    }

    fn remembered<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.scope.get::<T>(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key, "remembered value unreadable; using default");
                None
            }
        }
    }

    /// Folder id; empty means the root.
    ///
    /// # Errors
    ///
    /// Backend failure while storing `given`.
    pub fn folder(&self, given: Option<&str>) -> Result<String, StoreError> {
        match given {
            Some(folder) => {
                let folder = folder.trim();
                self.scope.set(Self::FOLDER_KEY, folder)?;
                Ok(folder.to_owned())
            }
            None => Ok(self.remembered::<String>(Self::FOLDER_KEY).unwrap_or_default()),
        }
    }

    /// # Errors
    ///
    /// Backend failure while storing `given`.
    pub fn recipient(&self, given: Option<RecipientType>) -> Result<RecipientType, StoreError> {
        match given {
            Some(to) => {
                self.scope.set(Self::RECIPIENT_KEY, to.as_str())?;
                Ok(to)
            }
            None => Ok(self
                .remembered::<String>(Self::RECIPIENT_KEY)
                .and_then(|name| RecipientType::from_name(&name))
                .unwrap_or_default()),
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
