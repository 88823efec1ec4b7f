//! Application layer: the state store and the seams it depends on.
//!
//! Code here orchestrates the domain types from `theme_state_core` and talks
//! to persistence only through the [`backend::StorageBackend`] trait, so the
//! store can be exercised against an in-memory backend or a mock.
//!
//! # Sub-modules
//!
//! - **`backend`**     – the key-value backend contract and its change events.
//! - **`store`**       – `ExtensionStore`: the snapshot plus its mutators,
//!   accessors, and loader.
//! - **`write_queue`** – FIFO queue that applies backend writes one at a time.
//! - **`migration`**   – schema-version reconciliation on load.
//! - **`observer`**    – diagnostic logging of backend change events.

pub mod backend;
pub mod migration;
pub mod observer;
pub mod store;
pub mod write_queue;
