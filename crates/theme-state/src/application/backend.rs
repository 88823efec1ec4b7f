//! The persistent key-value backend contract.
//!
//! The store never touches durable storage directly.  It calls a
//! [`StorageBackend`], which infrastructure implements (in memory, in a JSON
//! file) and tests replace with a mock.
//!
//! # Semantics expected from implementations
//!
//! - `get(defaults)` returns one entry per key of `defaults`: the stored
//!   value when present, the default otherwise.  Keys not in `defaults` are
//!   not returned.
//! - `set(items)` writes the given top-level keys and leaves every other key
//!   alone.
//! - `clear()` removes every key.
//! - Each successful `set`/`clear` publishes one [`StorageChange`] to
//!   subscribers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// Top-level key → JSON value.
pub type StorageMap = serde_json::Map<String, Value>;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored content could not be parsed or encoded.
    #[error("malformed storage content: {0}")]
    Parse(#[from] serde_json::Error),

    /// Any other backend-specific failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Old and new value of one key in a change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// One backend mutation as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub changes: BTreeMap<String, ValueChange>,
    /// Identifier of the storage area that changed (e.g. `"local"`).
    pub area_name: String,
}

impl StorageChange {
    pub fn changed_keys(&self) -> Vec<&str> {
        self.changes.keys().map(String::as_str).collect()
    }
}

/// A durable key-value store holding the persisted state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads the keys of `defaults`, falling back per key to the default.
    async fn get(&self, defaults: StorageMap) -> Result<StorageMap, StorageError>;

    /// Writes the given top-level keys.
    async fn set(&self, items: StorageMap) -> Result<(), StorageError>;

    /// Removes every key.
    async fn clear(&self) -> Result<(), StorageError>;

    /// Subscribes to change events.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}
