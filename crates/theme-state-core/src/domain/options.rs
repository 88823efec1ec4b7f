//! User preferences.
//!
//! [`ExtensionOptions`] holds the values.  [`ExtensionOption`] is the closed
//! list of option names, each declared up front as either a toggle or a
//! valued setting.  The UI receives one [`OptionSetData`] per option:
//!
//! | Kind    | Descriptor                                   |
//! |---------|----------------------------------------------|
//! | Toggle  | `{ option, enabled: <value> }`               |
//! | Setting | `{ option, enabled: true, value: <value> }`  |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Font size used by the userChrome/userContent CSS when none is set.
pub const DEFAULT_CSS_FONT_SIZE: u32 = 13;

/// Error returned when parsing an option name or an interval endpoint fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOptionError {
    #[error("unknown option: {0:?}")]
    UnknownOption(String),

    #[error("invalid time {0:?} (expected HH:MM)")]
    InvalidTime(String),
}

// ── Interval endpoints ────────────────────────────────────────────────────────

/// One end of the day/night interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeIntervalEndpoint {
    pub hour: u8,
    pub minute: u8,
    /// Precomputed `HH:MM` display string.
    pub string_format: String,
}

impl TimeIntervalEndpoint {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour,
            minute,
            string_format: format!("{hour:02}:{minute:02}"),
        }
    }
}

impl FromStr for TimeIntervalEndpoint {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseOptionError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self::new(hour, minute))
    }
}

// ── Options ───────────────────────────────────────────────────────────────────

/// The two CSS files the extension can theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CssTarget {
    UserChrome,
    UserContent,
}

/// User preferences, persisted under the `options` key.
///
/// Fields missing from a persisted object take their default individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionOptions {
    pub user_chrome: bool,
    pub user_content: bool,
    pub font_size: u32,
    pub duckduckgo: bool,
    pub darkreader: bool,
    pub fetch_on_startup: bool,
    pub interval_start: TimeIntervalEndpoint,
    pub interval_end: TimeIntervalEndpoint,
}

impl Default for ExtensionOptions {
    fn default() -> Self {
        Self {
            user_chrome: false,
            user_content: false,
            font_size: DEFAULT_CSS_FONT_SIZE,
            duckduckgo: false,
            darkreader: false,
            fetch_on_startup: false,
            interval_start: TimeIntervalEndpoint::new(10, 0),
            interval_end: TimeIntervalEndpoint::new(19, 0),
        }
    }
}

/// A partial update to [`ExtensionOptions`].  Present fields replace the
/// current value; interval endpoints are replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_chrome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duckduckgo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub darkreader: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_on_startup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_start: Option<TimeIntervalEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_end: Option<TimeIntervalEndpoint>,
}

impl OptionsPatch {
    /// A patch toggling one CSS target.
    pub fn css_enabled(target: CssTarget, enabled: bool) -> Self {
        match target {
            CssTarget::UserChrome => Self {
                user_chrome: Some(enabled),
                ..Self::default()
            },
            CssTarget::UserContent => Self {
                user_content: Some(enabled),
                ..Self::default()
            },
        }
    }
}

impl ExtensionOptions {
    /// Applies a one-level merge of `patch`.
    pub fn apply(&mut self, patch: &OptionsPatch) {
        if let Some(v) = patch.user_chrome {
            self.user_chrome = v;
        }
        if let Some(v) = patch.user_content {
            self.user_content = v;
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.duckduckgo {
            self.duckduckgo = v;
        }
        if let Some(v) = patch.darkreader {
            self.darkreader = v;
        }
        if let Some(v) = patch.fetch_on_startup {
            self.fetch_on_startup = v;
        }
        if let Some(v) = &patch.interval_start {
            self.interval_start = v.clone();
        }
        if let Some(v) = &patch.interval_end {
            self.interval_end = v.clone();
        }
    }

    pub fn css_enabled(&self, target: CssTarget) -> bool {
        match target {
            CssTarget::UserChrome => self.user_chrome,
            CssTarget::UserContent => self.user_content,
        }
    }

    /// Current state of one option.
    pub fn state_of(&self, option: ExtensionOption) -> OptionState {
        match option {
            ExtensionOption::UserChrome => OptionState::Toggle(self.user_chrome),
            ExtensionOption::UserContent => OptionState::Toggle(self.user_content),
            ExtensionOption::FontSize => OptionState::Setting(OptionValue::FontSize(self.font_size)),
            ExtensionOption::Duckduckgo => OptionState::Toggle(self.duckduckgo),
            ExtensionOption::Darkreader => OptionState::Toggle(self.darkreader),
            ExtensionOption::FetchOnStartup => OptionState::Toggle(self.fetch_on_startup),
            ExtensionOption::IntervalStart => {
                OptionState::Setting(OptionValue::Interval(self.interval_start.clone()))
            }
            ExtensionOption::IntervalEnd => {
                OptionState::Setting(OptionValue::Interval(self.interval_end.clone()))
            }
        }
    }

    /// One descriptor per option, in declaration order.
    pub fn descriptors(&self) -> Vec<OptionSetData> {
        ExtensionOption::ALL
            .iter()
            .map(|&option| OptionSetData::new(option, self.state_of(option)))
            .collect()
    }
}

// ── Option descriptors ────────────────────────────────────────────────────────

/// Whether an option is an on/off switch or carries a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Toggle,
    Setting,
}

/// Every option the UI can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionOption {
    UserChrome,
    UserContent,
    FontSize,
    Duckduckgo,
    Darkreader,
    FetchOnStartup,
    IntervalStart,
    IntervalEnd,
}

impl ExtensionOption {
    pub const ALL: [ExtensionOption; 8] = [
        ExtensionOption::UserChrome,
        ExtensionOption::UserContent,
        ExtensionOption::FontSize,
        ExtensionOption::Duckduckgo,
        ExtensionOption::Darkreader,
        ExtensionOption::FetchOnStartup,
        ExtensionOption::IntervalStart,
        ExtensionOption::IntervalEnd,
    ];

    pub fn kind(self) -> OptionKind {
        match self {
            ExtensionOption::FontSize
            | ExtensionOption::IntervalStart
            | ExtensionOption::IntervalEnd => OptionKind::Setting,
            _ => OptionKind::Toggle,
        }
    }

    /// The persisted key of this option.
    pub fn key(self) -> &'static str {
        match self {
            ExtensionOption::UserChrome => "userChrome",
            ExtensionOption::UserContent => "userContent",
            ExtensionOption::FontSize => "fontSize",
            ExtensionOption::Duckduckgo => "duckduckgo",
            ExtensionOption::Darkreader => "darkreader",
            ExtensionOption::FetchOnStartup => "fetchOnStartup",
            ExtensionOption::IntervalStart => "intervalStart",
            ExtensionOption::IntervalEnd => "intervalEnd",
        }
    }
}

impl fmt::Display for ExtensionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExtensionOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtensionOption::ALL
            .into_iter()
            .find(|option| option.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseOptionError::UnknownOption(s.to_string()))
    }
}

/// The value carried by a valued setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    FontSize(u32),
    Interval(TimeIntervalEndpoint),
}

/// Current state of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionState {
    Toggle(bool),
    Setting(OptionValue),
}

impl OptionState {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionState::Toggle(_) => OptionKind::Toggle,
            OptionState::Setting(_) => OptionKind::Setting,
        }
    }
}

/// The descriptor reported to the UI for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSetData {
    pub option: ExtensionOption,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<OptionValue>,
}

impl OptionSetData {
    pub fn new(option: ExtensionOption, state: OptionState) -> Self {
        match state {
            OptionState::Toggle(enabled) => Self {
                option,
                enabled,
                value: None,
            },
            OptionState::Setting(value) => Self {
                option,
                enabled: true,
                value: Some(value),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
