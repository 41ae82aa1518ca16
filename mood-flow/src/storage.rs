use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{FlowError, Result};

/// Key-value port for persisted client state.
///
/// Both the session-scoped navigation store and the longer-lived result cache
/// are expressed through this trait, so views can run against browser-like
/// storage, a file, or plain memory.
#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode a JSON value stored under `key`.
pub async fn read_json<T: DeserializeOwned>(store: &dyn StoragePort, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn write_json<T: Serialize + ?Sized>(store: &dyn StoragePort, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}

/// In-memory implementation of StoragePort
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[async_trait]
impl StoragePort for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed implementation of StoragePort.
///
/// All entries live in one JSON object on disk. Every mutation rewrites the
/// file through a temporary sibling and a rename, under a mutex, so writes are
/// serialized and a crash never leaves a half-written file behind.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file starts an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!(path = ?path, "Opening JSON file store");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory", parent, e))?;
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(io_error("read", &path, e)),
        };

        debug!(entries = entries.len(), "JSON file store ready");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| io_error("write", &tmp, e))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            warn!(path = ?tmp, "Leaving temporary store file behind");
            io_error("rename", &self.path, e)
        })
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> FlowError {
    FlowError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

#[async_trait]
impl StoragePort for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        // memory only changes once the file does
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}
