//! # theme-state-core
//!
//! Domain model for the palette theme state store: the persisted snapshot,
//! its default value, the derivations that read it, and the merge rules that
//! write it.
//!
//! This crate has no I/O, no async runtime, and no logging.  Everything here
//! is a plain value type or a pure function over one, so the rules can be
//! tested without a storage backend.
//!
//! # Architecture overview
//!
//! The store (in the `theme-state` crate) owns one [`ExtensionState`].  This
//! crate defines:
//!
//! - **`domain::mode`** – the user-selected [`ThemeMode`] and its resolved
//!   form [`TemplateMode`] (`Auto` collapsed using the day/night signal).
//!
//! - **`domain::template`** – theme templates, the generated theme, and the
//!   patch types that merge into them.
//!
//! - **`domain::user_theme`** – per-palette user overrides.
//!
//! - **`domain::options`** – user preferences and the closed set of option
//!   descriptors reported to the UI.
//!
//! - **`domain::state`** – the snapshot itself, the schema version
//!   constants, and conversion to and from the top-level storage keys.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `theme_state_core::ExtensionState` instead of the full module path.
pub use domain::mode::{ParseModeError, TemplateMode, ThemeMode};
pub use domain::options::{
    CssTarget, ExtensionOption, ExtensionOptions, OptionKind, OptionSetData, OptionState,
    OptionValue, OptionsPatch, ParseOptionError, TimeIntervalEndpoint,
};
pub use domain::state::{
    DebuggingInfo, ExtensionState, GlobalTemplates, InitialData, PywalColors, StateKey,
    LEGACY_STATE_VERSION, STATE_VERSION,
};
pub use domain::template::{
    BrowserTheme, GeneratedTheme, GeneratedThemePatch, ThemeTemplate, TemplatePatch,
};
pub use domain::user_theme::{CustomColors, CustomColorsPatch, UserTheme, UserThemePatch};
