//! Domain entities for the theme state store.
//!
//! Pure data and pure functions only: nothing in this module touches a
//! storage backend, a clock, or a runtime.
//!
//! # Merge rules
//!
//! Every mutable sub-tree of the snapshot has its own patch type and an
//! explicit `apply` method.  The rule is the same everywhere: string-keyed
//! maps merge key-by-key, scalars and lists are replaced wholesale, and an
//! absent patch field leaves the target untouched.

pub mod mode;
pub mod options;
pub mod state;
pub mod template;
pub mod user_theme;

mod merge;
