//! JSON-file storage backend.
//!
//! The whole state lives in one file as a pretty-printed JSON object, one
//! entry per top-level key:
//!
//! ```json
//! {
//!   "isDay": false,
//!   "mode": "auto",
//!   "stateVersion": 2.0
//! }
//! ```
//!
//! Every write is a read-modify-write of the whole file under a mutex, then
//! a rename over the old file, so a crash mid-write leaves the previous
//! content intact.  A missing file reads as empty storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use super::{apply_clear, apply_set, event_channel, publish, read_with_defaults};
use crate::application::backend::{StorageBackend, StorageChange, StorageError, StorageMap};

/// A [`StorageBackend`] persisting to a single JSON file.
pub struct JsonFileBackend {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
    events: broadcast::Sender<StorageChange>,
}

impl JsonFileBackend {
    /// Creates a backend for `path`.  Nothing is read or created until the
    /// first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            events: event_channel(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_items(&self) -> Result<StorageMap, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(StorageMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StorageMap::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn write_items(&self, items: &StorageMap) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StorageError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let content = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StorageError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn get(&self, defaults: StorageMap) -> Result<StorageMap, StorageError> {
        let _guard = self.lock.lock().await;
        let stored = self.read_items().await?;
        Ok(read_with_defaults(&stored, defaults))
    }

    async fn set(&self, items: StorageMap) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut stored = self.read_items().await?;
        let changes = apply_set(&mut stored, items);
        self.write_items(&stored).await?;
        debug!("{}: wrote {} keys", self.path.display(), changes.len());
        publish(&self.events, changes);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut stored = self.read_items().await?;
        let changes = apply_clear(&mut stored);
        self.write_items(&stored).await?;
        debug!("{}: cleared {} keys", self.path.display(), changes.len());
        publish(&self.events, changes);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.events.subscribe()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
