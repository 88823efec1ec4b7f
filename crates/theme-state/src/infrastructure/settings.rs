//! TOML settings for the `theme-state` command-line tool.
//!
//! Read from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\theme-state\settings.toml`
//! - Linux:    `~/.config/theme-state/settings.toml`
//! - macOS:    `~/Library/Application Support/theme-state/settings.toml`
//!
//! ```toml
//! [storage]
//! state_file = "/home/me/.local/share/theme-state/state.json"
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field is optional; a missing file means all defaults.  When
//! `state_file` is unset the state lives in the platform data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = "theme-state";
const SETTINGS_FILE: &str = "settings.toml";
const STATE_FILE: &str = "state.json";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config or data directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Where the state JSON lives.  `None` selects the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// The configured state file, or the platform default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoPlatformConfigDir`] when no file is
    /// configured and the platform data directory cannot be determined.
    pub fn state_file(&self) -> Result<PathBuf, SettingsError> {
        match &self.storage.state_file {
            Some(path) => Ok(path.clone()),
            None => default_state_file(),
        }
    }
}

// ── Locations ─────────────────────────────────────────────────────────────────

/// The directory holding `settings.toml`.
pub fn config_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir()
        .map(|base| base.join(APP_DIR))
        .ok_or(SettingsError::NoPlatformConfigDir)
}

pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    Ok(config_dir()?.join(SETTINGS_FILE))
}

/// Default location of the state JSON file.
pub fn default_state_file() -> Result<PathBuf, SettingsError> {
    platform_data_dir()
        .map(|base| base.join(APP_DIR).join(STATE_FILE))
        .ok_or(SettingsError::NoPlatformConfigDir)
}

/// Loads settings from the platform config file, returning the defaults if
/// the file does not exist yet.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&settings_file_path()?)
}

/// Loads settings from `path`; see [`load_settings`].
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA")
            .or_else(|| std::env::var_os("APPDATA"))
            .map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
