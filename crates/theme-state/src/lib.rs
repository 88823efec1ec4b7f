//! theme-state library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Layers
//!
//! ```text
//! theme_state_core      ExtensionState, templates, options, merge rules
//!        ↑
//! application/          ExtensionStore: mutators, accessors, loader,
//!                       write queue, change observer, StorageBackend trait
//!        ↑
//! infrastructure/       MemoryBackend, JsonFileBackend, CLI settings
//! ```

pub mod application;
pub mod infrastructure;

pub use application::backend::{StorageBackend, StorageChange, StorageError, StorageMap, ValueChange};
pub use application::migration::LoadOutcome;
pub use application::store::{ExtensionStore, StoreError};
pub use application::write_queue::PendingWrite;
