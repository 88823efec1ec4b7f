//! Storage adapters implementing [`StorageBackend`].
//!
//! - [`MemoryBackend`]: a map behind a mutex; used by tests and by callers
//!   that do not need durability.
//! - [`JsonFileBackend`]: the whole map as one pretty-printed JSON file.
//!
//! Both expose a single storage area named `"local"` and publish one
//! [`StorageChange`] per successful `set`/`clear`.
//!
//! [`StorageBackend`]: crate::application::backend::StorageBackend

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

use std::collections::BTreeMap;

use tokio::sync::broadcast;

use crate::application::backend::{StorageChange, StorageMap, ValueChange};

/// Name of the storage area both adapters report in change events.
pub const AREA_NAME: &str = "local";

/// Capacity of the change-event channel.  Slow subscribers lag rather than
/// block writers.
const EVENT_CAPACITY: usize = 64;

pub(crate) fn event_channel() -> broadcast::Sender<StorageChange> {
    broadcast::channel(EVENT_CAPACITY).0
}

/// Resolves `defaults` against `stored`: the stored value when present, the
/// default otherwise.
pub(crate) fn read_with_defaults(stored: &StorageMap, defaults: StorageMap) -> StorageMap {
    defaults
        .into_iter()
        .map(|(key, default)| {
            let value = stored.get(&key).cloned().unwrap_or(default);
            (key, value)
        })
        .collect()
}

/// Writes `items` into `stored` and returns the per-key changes.
pub(crate) fn apply_set(stored: &mut StorageMap, items: StorageMap) -> BTreeMap<String, ValueChange> {
    items
        .into_iter()
        .map(|(key, value)| {
            let old_value = stored.insert(key.clone(), value.clone());
            (
                key,
                ValueChange {
                    old_value,
                    new_value: Some(value),
                },
            )
        })
        .collect()
}

/// Empties `stored` and returns the per-key removals.
pub(crate) fn apply_clear(stored: &mut StorageMap) -> BTreeMap<String, ValueChange> {
    std::mem::take(stored)
        .into_iter()
        .map(|(key, value)| {
            (
                key,
                ValueChange {
                    old_value: Some(value),
                    new_value: None,
                },
            )
        })
        .collect()
}

/// Publishes `changes` unless there are none.  Having no subscriber is not
/// an error.
pub(crate) fn publish(events: &broadcast::Sender<StorageChange>, changes: BTreeMap<String, ValueChange>) {
    if changes.is_empty() {
        return;
    }
    let _ = events.send(StorageChange {
        changes,
        area_name: AREA_NAME.to_string(),
    });
}
