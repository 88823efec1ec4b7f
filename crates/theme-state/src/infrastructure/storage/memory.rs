//! In-memory storage backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use super::{apply_clear, apply_set, event_channel, publish, read_with_defaults};
use crate::application::backend::{StorageBackend, StorageChange, StorageError, StorageMap};

/// A [`StorageBackend`] holding everything in a map.
///
/// Counts `set`/`clear` calls so tests can assert that an operation did or
/// did not reach the backend.
pub struct MemoryBackend {
    items: Mutex<StorageMap>,
    events: broadcast::Sender<StorageChange>,
    set_calls: AtomicUsize,
    clear_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_items(StorageMap::new())
    }

    /// Creates a backend pre-populated with `items`.
    pub fn with_items(items: StorageMap) -> Self {
        Self {
            items: Mutex::new(items),
            events: event_channel(),
            set_calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
        }
    }

    /// A copy of everything currently stored.
    pub async fn items(&self) -> StorageMap {
        self.items.lock().await.clone()
    }

    pub fn set_count(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }

    /// Number of live change-event receivers.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, defaults: StorageMap) -> Result<StorageMap, StorageError> {
        let items = self.items.lock().await;
        Ok(read_with_defaults(&items, defaults))
    }

    async fn set(&self, items: StorageMap) -> Result<(), StorageError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        let changes = {
            let mut stored = self.items.lock().await;
            apply_set(&mut stored, items)
        };
        debug!("memory backend: set {} keys", changes.len());
        publish(&self.events, changes);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        let changes = {
            let mut stored = self.items.lock().await;
            apply_clear(&mut stored)
        };
        debug!("memory backend: cleared {} keys", changes.len());
        publish(&self.events, changes);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.events.subscribe()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
