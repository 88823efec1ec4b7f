//! The persisted snapshot.
//!
//! [`ExtensionState`] is stored in the key-value backend one top-level field
//! per key.  [`StateKey`] names those keys, and the conversion helpers move a
//! single field (or the whole state) in and out of JSON so that mutators can
//! persist exactly the sub-tree they changed.
//!
//! # Schema versions
//!
//! | `stateVersion`           | Meaning                                     |
//! |--------------------------|---------------------------------------------|
//! | [`LEGACY_STATE_VERSION`] | Written by releases before versioned state. |
//! | [`STATE_VERSION`]        | Current schema.                             |
//!
//! The default state carries the legacy marker; the loader stamps the
//! current version when it migrates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::mode::{TemplateMode, ThemeMode};
use super::options::{ExtensionOptions, OptionSetData, TimeIntervalEndpoint};
use super::template::{GeneratedTheme, ThemeTemplate};
use super::user_theme::UserTheme;

/// Current schema version of the persisted state.
pub const STATE_VERSION: f64 = 2.0;

/// Schema marker of state written before versioning existed.
pub const LEGACY_STATE_VERSION: f64 = 0.0;

/// The pywal palette, as produced by the palette-generation collaborator.
pub type PywalColors = Vec<String>;

/// Global templates, one per resolved mode.
///
/// A struct rather than a map so that exactly the two static modes can ever
/// be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalTemplates {
    pub light: ThemeTemplate,
    pub dark: ThemeTemplate,
}

impl Default for GlobalTemplates {
    fn default() -> Self {
        Self {
            light: ThemeTemplate::builtin_light(),
            dark: ThemeTemplate::builtin_dark(),
        }
    }
}

impl GlobalTemplates {
    pub fn get(&self, mode: TemplateMode) -> &ThemeTemplate {
        match mode {
            TemplateMode::Light => &self.light,
            TemplateMode::Dark => &self.dark,
        }
    }

    pub fn get_mut(&mut self, mode: TemplateMode) -> &mut ThemeTemplate {
        match mode {
            TemplateMode::Light => &mut self.light,
            TemplateMode::Dark => &mut self.dark,
        }
    }
}

/// The complete in-memory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionState {
    pub version: f64,
    pub state_version: f64,
    pub connected: bool,
    pub update_muted: bool,
    pub mode: ThemeMode,
    pub is_day: bool,
    pub is_applied: bool,
    pub pywal_colors: Option<PywalColors>,
    pub pywal_hash: Option<String>,
    pub generated_theme: Option<GeneratedTheme>,
    pub global_templates: GlobalTemplates,
    /// Palette hash → resolved mode → overrides.
    pub user_themes: BTreeMap<String, BTreeMap<TemplateMode, UserTheme>>,
    pub options: ExtensionOptions,
}

impl Default for ExtensionState {
    fn default() -> Self {
        Self {
            version: 0.0,
            state_version: LEGACY_STATE_VERSION,
            connected: false,
            update_muted: false,
            mode: ThemeMode::Dark,
            is_day: false,
            is_applied: false,
            pywal_colors: None,
            pywal_hash: None,
            generated_theme: None,
            global_templates: GlobalTemplates::default(),
            user_themes: BTreeMap::new(),
            options: ExtensionOptions::default(),
        }
    }
}

// ── Derivations ───────────────────────────────────────────────────────────────

impl ExtensionState {
    /// The mode used for every mode-keyed lookup.  Never `Auto`.
    pub fn resolve_theme_mode(&self) -> TemplateMode {
        self.mode.resolve(self.is_day)
    }

    /// The global template for the resolved mode.
    pub fn global_template(&self) -> &ThemeTemplate {
        self.global_templates.get(self.resolve_theme_mode())
    }

    /// The generated theme's template, or the global template when no theme
    /// has been generated.
    pub fn generated_template(&self) -> &ThemeTemplate {
        match &self.generated_theme {
            Some(theme) => &theme.template,
            None => self.global_template(),
        }
    }

    /// Overrides for the current palette in the resolved mode, or `None` when
    /// there is no palette hash or nothing stored for it.
    pub fn user_theme(&self) -> Option<&UserTheme> {
        let hash = self.pywal_hash.as_ref()?;
        self.user_themes
            .get(hash)?
            .get(&self.resolve_theme_mode())
    }

    pub fn interval(&self) -> (&TimeIntervalEndpoint, &TimeIntervalEndpoint) {
        (&self.options.interval_start, &self.options.interval_end)
    }

    pub fn options_data(&self) -> Vec<OptionSetData> {
        self.options.descriptors()
    }

    pub fn debugging_info(&self) -> DebuggingInfo {
        DebuggingInfo {
            version: self.version,
            connected: self.connected,
        }
    }

    /// The bundle the UI requests when it opens.
    pub fn initial_data(&self) -> InitialData {
        InitialData {
            debugging_info: self.debugging_info(),
            is_applied: self.is_applied,
            pywal_colors: self.pywal_colors.clone(),
            template: self.generated_template().clone(),
            user_theme: self.user_theme().cloned().unwrap_or_default(),
            theme_mode: self.mode,
            template_theme_mode: self.resolve_theme_mode(),
            options: self.options_data(),
        }
    }
}

/// Version and connection state shown in the UI's debugging panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebuggingInfo {
    pub version: f64,
    pub connected: bool,
}

/// Everything the UI needs to render its first frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    pub debugging_info: DebuggingInfo,
    pub is_applied: bool,
    pub pywal_colors: Option<PywalColors>,
    pub template: ThemeTemplate,
    pub user_theme: UserTheme,
    pub theme_mode: ThemeMode,
    pub template_theme_mode: TemplateMode,
    pub options: Vec<OptionSetData>,
}

// ── Storage keys ──────────────────────────────────────────────────────────────

/// Top-level keys of the persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Version,
    StateVersion,
    Connected,
    UpdateMuted,
    Mode,
    IsDay,
    IsApplied,
    PywalColors,
    PywalHash,
    GeneratedTheme,
    GlobalTemplates,
    UserThemes,
    Options,
}

impl StateKey {
    pub const ALL: [StateKey; 13] = [
        StateKey::Version,
        StateKey::StateVersion,
        StateKey::Connected,
        StateKey::UpdateMuted,
        StateKey::Mode,
        StateKey::IsDay,
        StateKey::IsApplied,
        StateKey::PywalColors,
        StateKey::PywalHash,
        StateKey::GeneratedTheme,
        StateKey::GlobalTemplates,
        StateKey::UserThemes,
        StateKey::Options,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::Version => "version",
            StateKey::StateVersion => "stateVersion",
            StateKey::Connected => "connected",
            StateKey::UpdateMuted => "updateMuted",
            StateKey::Mode => "mode",
            StateKey::IsDay => "isDay",
            StateKey::IsApplied => "isApplied",
            StateKey::PywalColors => "pywalColors",
            StateKey::PywalHash => "pywalHash",
            StateKey::GeneratedTheme => "generatedTheme",
            StateKey::GlobalTemplates => "globalTemplates",
            StateKey::UserThemes => "userThemes",
            StateKey::Options => "options",
        }
    }

    pub fn from_key(key: &str) -> Option<StateKey> {
        StateKey::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExtensionState {
    /// Serializes one top-level field.
    pub fn field_value(&self, key: StateKey) -> Result<Value, serde_json::Error> {
        match key {
            StateKey::Version => serde_json::to_value(self.version),
            StateKey::StateVersion => serde_json::to_value(self.state_version),
            StateKey::Connected => serde_json::to_value(self.connected),
            StateKey::UpdateMuted => serde_json::to_value(self.update_muted),
            StateKey::Mode => serde_json::to_value(self.mode),
            StateKey::IsDay => serde_json::to_value(self.is_day),
            StateKey::IsApplied => serde_json::to_value(self.is_applied),
            StateKey::PywalColors => serde_json::to_value(&self.pywal_colors),
            StateKey::PywalHash => serde_json::to_value(&self.pywal_hash),
            StateKey::GeneratedTheme => serde_json::to_value(&self.generated_theme),
            StateKey::GlobalTemplates => serde_json::to_value(&self.global_templates),
            StateKey::UserThemes => serde_json::to_value(&self.user_themes),
            StateKey::Options => serde_json::to_value(&self.options),
        }
    }

    /// Replaces one top-level field from its JSON value.  On error the field
    /// is left unchanged.
    pub fn set_field_value(&mut self, key: StateKey, value: Value) -> Result<(), serde_json::Error> {
        match key {
            StateKey::Version => self.version = serde_json::from_value(value)?,
            StateKey::StateVersion => self.state_version = serde_json::from_value(value)?,
            StateKey::Connected => self.connected = serde_json::from_value(value)?,
            StateKey::UpdateMuted => self.update_muted = serde_json::from_value(value)?,
            StateKey::Mode => self.mode = serde_json::from_value(value)?,
            StateKey::IsDay => self.is_day = serde_json::from_value(value)?,
            StateKey::IsApplied => self.is_applied = serde_json::from_value(value)?,
            StateKey::PywalColors => self.pywal_colors = serde_json::from_value(value)?,
            StateKey::PywalHash => self.pywal_hash = serde_json::from_value(value)?,
            StateKey::GeneratedTheme => self.generated_theme = serde_json::from_value(value)?,
            StateKey::GlobalTemplates => self.global_templates = serde_json::from_value(value)?,
            StateKey::UserThemes => self.user_themes = serde_json::from_value(value)?,
            StateKey::Options => self.options = serde_json::from_value(value)?,
        }
        Ok(())
    }

    /// The given fields as storage items.
    pub fn storage_items(&self, keys: &[StateKey]) -> Result<Map<String, Value>, serde_json::Error> {
        keys.iter()
            .map(|&key| Ok((key.as_str().to_string(), self.field_value(key)?)))
            .collect()
    }

    /// Every field as storage items.
    pub fn to_storage_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        self.storage_items(&StateKey::ALL)
    }

    /// Builds a state from storage items, one key at a time.
    ///
    /// Missing keys keep their default.  A key whose value does not fit its
    /// field also keeps its default and is returned in the second element so
    /// the caller can report it.  Unknown keys are ignored.
    pub fn from_storage_map(items: &Map<String, Value>) -> (Self, Vec<StateKey>) {
        let mut state = Self::default();
        let mut rejected = Vec::new();
        for key in StateKey::ALL {
            if let Some(value) = items.get(key.as_str()) {
                if state.set_field_value(key, value.clone()).is_err() {
                    rejected.push(key);
                }
            }
        }
        (state, rejected)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
