//! Infrastructure layer.
//!
//! Contains the concrete storage adapters and the CLI settings file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `theme_state_core`, but MUST NOT be imported by the `application` layer.

pub mod settings;
pub mod storage;
