//! ExtensionStore: the single owner of the theme state snapshot.
//!
//! The store holds one [`ExtensionState`] and keeps the backend in sync with
//! it.  It is constructed explicitly and shared by handle (`Arc`), never as a
//! process-wide global, so tests can run independent instances side by side.
//!
//! # Lifecycle
//!
//! ```text
//! ExtensionStore::new(backend)   snapshot = defaults; writer + observer spawned
//!        │
//! store.load().await             snapshot = persisted (per-key fallback),
//!        │                       legacy schema migrated
//!        ▼
//! accessors / mutators           reads clone out of the snapshot;
//!                                writes merge into it, then enqueue the
//!                                changed keys on the write queue
//! ```
//!
//! # Write-through
//!
//! Every mutator updates the snapshot *before* it returns, then forwards only
//! the top-level keys it changed.  The returned [`PendingWrite`] resolves when
//! the backend has applied the write; awaiting it is optional.  The snapshot
//! update and the enqueue happen under the same lock, so the backend sees
//! writes in exactly the order the snapshot changed.

mod accessors;
mod mutators;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use theme_state_core::{ExtensionState, StateKey, STATE_VERSION};

use super::backend::{StorageBackend, StorageError};
use super::migration::{self, LoadOutcome};
use super::observer::spawn_change_observer;
use super::write_queue::{PendingWrite, WriteOp, WriteQueue};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed; the error is passed through unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The snapshot could not be encoded for storage.
    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    /// The writer task is gone, so the write was never applied.
    #[error("write queue is closed")]
    WriterClosed,
}

/// The theme state store.
pub struct ExtensionStore {
    state: Mutex<ExtensionState>,
    backend: Arc<dyn StorageBackend>,
    writer: WriteQueue,
    observer: JoinHandle<()>,
}

impl ExtensionStore {
    /// Creates a store holding the default state.
    ///
    /// Subscribes the change observer and spawns the writer task, so this
    /// must be called inside a Tokio runtime.  Call [`load`](Self::load)
    /// before using the store.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let observer = spawn_change_observer(backend.subscribe());
        let writer = WriteQueue::spawn(Arc::clone(&backend));
        Self {
            state: Mutex::new(ExtensionState::default()),
            backend,
            writer,
            observer,
        }
    }

    /// Replaces the snapshot with the persisted state and reconciles schema
    /// versions.
    ///
    /// Missing keys take their default; keys whose stored value does not fit
    /// take their default and are logged.  Legacy state (`stateVersion`
    /// absent or `0.0`) is cleared from the backend and replaced with the
    /// defaults.  A `stateVersion` of any other value, including one that is
    /// not a number, leaves the backend untouched.
    ///
    /// # Errors
    ///
    /// Backend failures are returned unchanged.  If the clear succeeds and the
    /// following write fails, the backend is left empty.
    pub async fn load(&self) -> Result<LoadOutcome, StoreError> {
        let defaults = ExtensionState::default()
            .to_storage_map()
            .map_err(StoreError::Encode)?;
        let stored = self.backend.get(defaults).await?;

        let (loaded, rejected) = ExtensionState::from_storage_map(&stored);
        for key in rejected {
            warn!("persisted {key} is malformed; using the default");
        }

        let outcome = migration::classify(stored.get(StateKey::StateVersion.as_str()));
        match &outcome {
            LoadOutcome::Current => {
                *self.state() = loaded;
                debug!("loaded state at schema {STATE_VERSION}");
            }
            LoadOutcome::Migrated { from } => {
                info!("migrating state from schema {from} to {STATE_VERSION}");
                let migrated = migration::migrate_legacy();
                let items = migrated.to_storage_map().map_err(StoreError::Encode)?;
                *self.state() = migrated;
                self.writer.enqueue(WriteOp::Clear).await?;
                self.writer.enqueue(WriteOp::Set(items)).await?;
            }
            LoadOutcome::UnrecognisedVersion { found } => {
                warn!("persisted state has unrecognised schema {found} (expected {STATE_VERSION}); leaving it untouched");
                *self.state() = loaded;
            }
        }
        Ok(outcome)
    }

    /// Logs the whole snapshot at debug level.
    pub fn dump(&self) {
        debug!("{:?}", *self.state());
    }

    fn state(&self) -> MutexGuard<'_, ExtensionState> {
        // A panic while holding the lock cannot leave the state half-merged
        // in a way later readers care about; keep serving it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `mutate` to the snapshot and persists `keys`.
    ///
    /// `mutate` returns `false` when its precondition is not met; nothing is
    /// written in that case.
    fn commit<F>(&self, keys: &[StateKey], mutate: F) -> PendingWrite
    where
        F: FnOnce(&mut ExtensionState) -> bool,
    {
        let mut state = self.state();
        if !mutate(&mut state) {
            return PendingWrite::noop();
        }
        match state.storage_items(keys) {
            Ok(items) => self.writer.enqueue(WriteOp::Set(items)),
            Err(e) => PendingWrite::failed(StoreError::Encode(e)),
        }
    }
}

impl Drop for ExtensionStore {
    fn drop(&mut self) {
        self.observer.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::backend::{MockStorageBackend, StorageChange, StorageMap};
    use serde_json::json;
    use theme_state_core::{CustomColors, GeneratedTheme, OptionsPatch, TemplatePatch, ThemeMode};
    use tokio::sync::broadcast;

    fn mock_backend() -> MockStorageBackend {
        let mut mock = MockStorageBackend::new();
        mock.expect_subscribe()
            .returning(|| broadcast::channel::<StorageChange>(1).1);
        mock
    }

    fn key_set(items: &StorageMap) -> Vec<&str> {
        items.keys().map(String::as_str).collect()
    }

    #[tokio::test]
    async fn test_mutator_persists_only_the_changed_key() {
        // Arrange
        let mut mock = mock_backend();
        mock.expect_set()
            .withf(|items| key_set(items) == vec!["options"])
            .times(1)
            .returning(|_| Ok(()));
        let store = ExtensionStore::new(Arc::new(mock));

        // Act
        let result = store
            .update_options(OptionsPatch {
                font_size: Some(20),
                ..Default::default()
            })
            .await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_global_template_write_contains_both_modes() {
        let mut mock = mock_backend();
        mock.expect_set()
            .withf(|items| {
                let templates = &items["globalTemplates"];
                templates.get("light").is_some() && templates.get("dark").is_some()
            })
            .times(1)
            .returning(|_| Ok(()));
        let store = ExtensionStore::new(Arc::new(mock));

        store
            .update_global_template(TemplatePatch::default().with_palette_slot("text", 3))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_user_theme_update_without_hash_writes_nothing() {
        // Arrange: any set call would fail the test
        let mut mock = mock_backend();
        mock.expect_set().times(0);
        let store = ExtensionStore::new(Arc::new(mock));

        // Act
        let pending = store.set_custom_colors(CustomColors::from([(
            "background".to_string(),
            "#000".to_string(),
        )]));

        // Assert
        assert!(pending.is_noop());
        assert!(pending.await.is_ok());
        assert!(store.snapshot().user_themes.is_empty());
    }

    #[tokio::test]
    async fn test_generated_template_update_without_theme_writes_nothing() {
        let mut mock = mock_backend();
        mock.expect_set().times(0);
        let store = ExtensionStore::new(Arc::new(mock));

        let pending = store.update_generated_template(TemplatePatch::default().with_palette_slot("text", 1));

        assert!(pending.is_noop());
        assert!(store.get_generated_theme().is_none());
    }

    #[tokio::test]
    async fn test_failed_write_surfaces_error_but_snapshot_keeps_value() {
        // Arrange
        let mut mock = mock_backend();
        mock.expect_set()
            .returning(|_| Err(StorageError::Backend("disk full".to_string())));
        let store = ExtensionStore::new(Arc::new(mock));

        // Act
        let result = store.set_theme_mode(ThemeMode::Light).await;

        // Assert
        assert!(matches!(result, Err(StoreError::Storage(StorageError::Backend(_)))));
        assert_eq!(store.get_theme_mode(), ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_load_propagates_read_failure() {
        let mut mock = mock_backend();
        mock.expect_get()
            .returning(|_| Err(StorageError::Backend("unavailable".to_string())));
        let store = ExtensionStore::new(Arc::new(mock));

        let result = store.load().await;

        assert!(matches!(result, Err(StoreError::Storage(_))));
        assert_eq!(store.snapshot(), ExtensionState::default());
    }

    #[tokio::test]
    async fn test_load_of_legacy_state_clears_then_writes_defaults() {
        // Arrange
        let mut seq = mockall::Sequence::new();
        let mut mock = mock_backend();
        mock.expect_get().returning(|defaults| Ok(defaults));
        mock.expect_clear()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        mock.expect_set()
            .withf(|items| items["stateVersion"] == json!(STATE_VERSION) && items.len() == StateKey::ALL.len())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let store = ExtensionStore::new(Arc::new(mock));

        // Act
        let outcome = store.load().await.unwrap();

        // Assert
        assert_eq!(outcome, LoadOutcome::Migrated { from: 0.0 });
        assert_eq!(store.snapshot().state_version, STATE_VERSION);
    }

    #[tokio::test]
    async fn test_migration_write_failure_after_clear_is_returned() {
        let mut mock = mock_backend();
        mock.expect_get().returning(|defaults| Ok(defaults));
        mock.expect_clear().times(1).returning(|| Ok(()));
        mock.expect_set()
            .times(1)
            .returning(|_| Err(StorageError::Backend("write rejected".to_string())));
        let store = ExtensionStore::new(Arc::new(mock));

        let result = store.load().await;

        assert!(matches!(result, Err(StoreError::Storage(StorageError::Backend(_)))));
    }

    #[tokio::test]
    async fn test_load_of_failed_clear_skips_write() {
        let mut mock = mock_backend();
        mock.expect_get().returning(|defaults| Ok(defaults));
        mock.expect_clear()
            .times(1)
            .returning(|| Err(StorageError::Backend("locked".to_string())));
        mock.expect_set().times(0);
        let store = ExtensionStore::new(Arc::new(mock));

        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_load_of_unrecognised_version_writes_nothing() {
        // Arrange
        let mut mock = mock_backend();
        mock.expect_get().returning(|mut defaults| {
            defaults.insert("stateVersion".into(), json!(1.5));
            defaults.insert("mode".into(), json!("auto"));
            Ok(defaults)
        });
        mock.expect_clear().times(0);
        mock.expect_set().times(0);
        let store = ExtensionStore::new(Arc::new(mock));

        // Act
        let outcome = store.load().await.unwrap();

        // Assert
        assert_eq!(outcome, LoadOutcome::UnrecognisedVersion { found: json!(1.5) });
        assert_eq!(store.get_theme_mode(), ThemeMode::Auto);
    }

    #[tokio::test]
    async fn test_load_falls_back_per_key_for_malformed_values() {
        let mut mock = mock_backend();
        mock.expect_get().returning(|mut defaults| {
            defaults.insert("stateVersion".into(), json!(STATE_VERSION));
            defaults.insert("isDay".into(), json!("yes"));
            defaults.insert("pywalHash".into(), json!("abc123"));
            Ok(defaults)
        });
        let store = ExtensionStore::new(Arc::new(mock));

        assert_eq!(store.load().await.unwrap(), LoadOutcome::Current);

        assert!(!store.get_is_day());
        assert_eq!(store.get_pywal_hash().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_reset_generated_theme_persists_null() {
        let mut mock = mock_backend();
        mock.expect_set()
            .withf(|items| items["generatedTheme"].is_object())
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_set()
            .withf(|items| items["generatedTheme"].is_null())
            .times(1)
            .returning(|_| Ok(()));
        let store = ExtensionStore::new(Arc::new(mock));

        let _ = store.set_generated_theme(Some(GeneratedTheme::default()));
        store.reset_generated_theme().await.unwrap();

        assert!(store.get_generated_theme().is_none());
    }
}
