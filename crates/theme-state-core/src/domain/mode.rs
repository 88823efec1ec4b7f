//! Theme modes.
//!
//! The user picks a [`ThemeMode`].  Everything keyed by mode (global
//! templates, per-palette overrides) is keyed by the *resolved*
//! [`TemplateMode`] instead, which can never be `Auto`.
//!
//! ```text
//! ThemeMode::Dark  ───────────────► TemplateMode::Dark
//! ThemeMode::Light ───────────────► TemplateMode::Light
//! ThemeMode::Auto  ── is_day ─────► TemplateMode::Light
//!                  └─ !is_day ────► TemplateMode::Dark
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a mode string is not one of `dark`, `light`, `auto`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme mode: {0:?} (expected dark, light or auto)")]
pub struct ParseModeError(pub String);

/// The theme mode selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
    /// Follows the externally supplied day/night signal.
    Auto,
}

impl ThemeMode {
    /// Collapses `Auto` using the day/night signal.  Static modes are
    /// returned unchanged regardless of `is_day`.
    pub fn resolve(self, is_day: bool) -> TemplateMode {
        match self {
            ThemeMode::Dark => TemplateMode::Dark,
            ThemeMode::Light => TemplateMode::Light,
            ThemeMode::Auto if is_day => TemplateMode::Light,
            ThemeMode::Auto => TemplateMode::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
            ThemeMode::Auto => "auto",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            "auto" => Ok(ThemeMode::Auto),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// A resolved theme mode, used as the key for every mode-keyed lookup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateMode {
    Dark,
    Light,
}

impl TemplateMode {
    /// The opposite static mode.
    pub fn other(self) -> TemplateMode {
        match self {
            TemplateMode::Dark => TemplateMode::Light,
            TemplateMode::Light => TemplateMode::Dark,
        }
    }
}

impl From<TemplateMode> for ThemeMode {
    fn from(mode: TemplateMode) -> Self {
        match mode {
            TemplateMode::Dark => ThemeMode::Dark,
            TemplateMode::Light => ThemeMode::Light,
        }
    }
}

impl fmt::Display for TemplateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ThemeMode::from(*self).fmt(f)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
