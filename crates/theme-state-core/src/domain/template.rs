//! Theme templates and the generated theme.
//!
//! A [`ThemeTemplate`] describes *how* a pywal palette is turned into a
//! theme, without containing any colors itself:
//!
//! - `palette` maps each palette slot (`background`, `text`, …) to an index
//!   into the 16 pywal colors.
//! - `browser`, `extension`, `duckduckgo` and `darkreader` map each theme
//!   target of that surface to a palette slot name.
//!
//! The rendering collaborator combines a template with the current pywal
//! colors and hands the result back as a [`GeneratedTheme`].
//!
//! # Example
//!
//! ```rust
//! use theme_state_core::{ThemeTemplate, TemplatePatch};
//!
//! let mut template = ThemeTemplate::builtin_dark();
//! let patch = TemplatePatch::default().with_palette_slot("background", 8);
//! template.apply(&patch);
//! assert_eq!(template.palette["background"], 8);
//! assert_eq!(template.palette["text"], 15);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::merge::{merge_map, merge_optional_map};

/// Palette slot → pywal color index (0–15).
pub type PaletteTemplate = BTreeMap<String, u8>;

/// Theme target → palette slot name.
pub type TargetTemplate = BTreeMap<String, String>;

/// A complete theme template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeTemplate {
    #[serde(default)]
    pub palette: PaletteTemplate,
    #[serde(default)]
    pub browser: TargetTemplate,
    #[serde(default)]
    pub extension: TargetTemplate,
    #[serde(default)]
    pub duckduckgo: TargetTemplate,
    #[serde(default)]
    pub darkreader: TargetTemplate,
}

/// A partial template.  Present sections merge key-by-key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<PaletteTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<TargetTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<TargetTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duckduckgo: Option<TargetTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub darkreader: Option<TargetTemplate>,
}

/// Slot names shared by both builtin templates.
const BUILTIN_BROWSER_TARGETS: &[(&str, &str)] = &[
    ("icons", "accentPrimary"),
    ("icons_attention", "accentSecondary"),
    ("frame", "background"),
    ("tab_text", "text"),
    ("tab_loading", "accentPrimary"),
    ("tab_background_text", "text"),
    ("tab_selected", "backgroundLight"),
    ("tab_line", "accentPrimary"),
    ("toolbar", "backgroundLight"),
    ("toolbar_text", "text"),
    ("toolbar_field", "background"),
    ("toolbar_field_focus", "background"),
    ("toolbar_field_text", "text"),
    ("toolbar_field_text_focus", "textFocus"),
    ("popup", "background"),
    ("popup_text", "text"),
    ("sidebar", "background"),
    ("sidebar_text", "text"),
    ("ntp_background", "background"),
    ("ntp_text", "text"),
];

const BUILTIN_EXTENSION_TARGETS: &[(&str, &str)] = &[
    ("background", "background"),
    ("backgroundLight", "backgroundLight"),
    ("text", "text"),
    ("textFocus", "textFocus"),
    ("accentPrimary", "accentPrimary"),
    ("accentSecondary", "accentSecondary"),
];

const BUILTIN_DUCKDUCKGO_TARGETS: &[(&str, &str)] = &[
    ("background", "background"),
    ("header", "backgroundLight"),
    ("result_title", "accentPrimary"),
    ("result_url", "textFocus"),
    ("result_snippet", "text"),
    ("result_visited", "accentSecondary"),
];

const BUILTIN_DARKREADER_TARGETS: &[(&str, &str)] = &[
    ("background", "background"),
    ("text", "text"),
    ("selection", "accentPrimary"),
];

fn targets(entries: &[(&str, &str)]) -> TargetTemplate {
    entries
        .iter()
        .map(|(target, slot)| (target.to_string(), slot.to_string()))
        .collect()
}

fn palette(entries: &[(&str, u8)]) -> PaletteTemplate {
    entries
        .iter()
        .map(|(slot, index)| (slot.to_string(), *index))
        .collect()
}

impl ThemeTemplate {
    /// The builtin template used for the dark mode.
    pub fn builtin_dark() -> Self {
        Self {
            palette: palette(&[
                ("background", 0),
                ("backgroundLight", 8),
                ("backgroundExtra", 8),
                ("accentPrimary", 1),
                ("accentSecondary", 2),
                ("text", 15),
                ("textFocus", 7),
            ]),
            ..Self::builtin_targets()
        }
    }

    /// The builtin template used for the light mode.
    pub fn builtin_light() -> Self {
        Self {
            palette: palette(&[
                ("background", 15),
                ("backgroundLight", 7),
                ("backgroundExtra", 7),
                ("accentPrimary", 1),
                ("accentSecondary", 2),
                ("text", 0),
                ("textFocus", 8),
            ]),
            ..Self::builtin_targets()
        }
    }

    fn builtin_targets() -> Self {
        Self {
            palette: PaletteTemplate::new(),
            browser: targets(BUILTIN_BROWSER_TARGETS),
            extension: targets(BUILTIN_EXTENSION_TARGETS),
            duckduckgo: targets(BUILTIN_DUCKDUCKGO_TARGETS),
            darkreader: targets(BUILTIN_DARKREADER_TARGETS),
        }
    }

    /// Merges `patch` into this template, section by section.
    pub fn apply(&mut self, patch: &TemplatePatch) {
        if let Some(palette) = &patch.palette {
            merge_map(&mut self.palette, palette);
        }
        if let Some(browser) = &patch.browser {
            merge_map(&mut self.browser, browser);
        }
        if let Some(extension) = &patch.extension {
            merge_map(&mut self.extension, extension);
        }
        if let Some(duckduckgo) = &patch.duckduckgo {
            merge_map(&mut self.duckduckgo, duckduckgo);
        }
        if let Some(darkreader) = &patch.darkreader {
            merge_map(&mut self.darkreader, darkreader);
        }
    }
}

impl TemplatePatch {
    /// Returns the patch with one palette slot set.
    pub fn with_palette_slot(mut self, slot: impl Into<String>, index: u8) -> Self {
        self.palette
            .get_or_insert_with(PaletteTemplate::new)
            .insert(slot.into(), index);
        self
    }

    /// Returns the patch with one browser target mapped to a palette slot.
    pub fn with_browser_target(mut self, target: impl Into<String>, slot: impl Into<String>) -> Self {
        self.browser
            .get_or_insert_with(TargetTemplate::new)
            .insert(target.into(), slot.into());
        self
    }

    /// Merges another patch into this one.  Used for user templates, which
    /// are stored as patches rather than full templates.
    pub fn merge(&mut self, other: &TemplatePatch) {
        merge_optional_map(&mut self.palette, &other.palette);
        merge_optional_map(&mut self.browser, &other.browser);
        merge_optional_map(&mut self.extension, &other.extension);
        merge_optional_map(&mut self.duckduckgo, &other.duckduckgo);
        merge_optional_map(&mut self.darkreader, &other.darkreader);
    }

    pub fn is_empty(&self) -> bool {
        self.palette.is_none()
            && self.browser.is_none()
            && self.extension.is_none()
            && self.duckduckgo.is_none()
            && self.darkreader.is_none()
    }
}

impl From<ThemeTemplate> for TemplatePatch {
    fn from(template: ThemeTemplate) -> Self {
        Self {
            palette: Some(template.palette),
            browser: Some(template.browser),
            extension: Some(template.extension),
            duckduckgo: Some(template.duckduckgo),
            darkreader: Some(template.darkreader),
        }
    }
}

// ── Generated theme ───────────────────────────────────────────────────────────

/// A browser theme as understood by the browser's theme API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrowserTheme {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl BrowserTheme {
    pub fn apply(&mut self, patch: &BrowserTheme) {
        merge_map(&mut self.colors, &patch.colors);
        merge_map(&mut self.properties, &patch.properties);
    }
}

/// The last theme produced by the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedTheme {
    /// The template the theme was rendered from.
    #[serde(default)]
    pub template: ThemeTemplate,
    /// Palette slot → rendered color.
    #[serde(default)]
    pub palette: BTreeMap<String, String>,
    #[serde(default)]
    pub browser: BrowserTheme,
}

/// A partial generated theme.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedThemePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplatePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserTheme>,
}

impl GeneratedTheme {
    pub fn apply(&mut self, patch: &GeneratedThemePatch) {
        if let Some(template) = &patch.template {
            self.template.apply(template);
        }
        if let Some(palette) = &patch.palette {
            merge_map(&mut self.palette, palette);
        }
        if let Some(browser) = &patch.browser {
            self.browser.apply(browser);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
