//! Per-palette user overrides.
//!
//! Overrides are stored per palette hash and per resolved mode.  An entry
//! carries an optional partial template and an optional set of custom
//! colors.  Repeated updates accumulate: setting `background` and later
//! `text` leaves both custom colors in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::merge::merge_map;
use super::template::TemplatePatch;

/// Palette slot → color string (e.g. `"background" → "#000000"`).
pub type CustomColors = BTreeMap<String, String>;

/// The user's overrides for one palette in one mode.
///
/// The empty value serializes as `{}`; accessors return it instead of
/// `None` so callers can merge unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_template: Option<TemplatePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<CustomColors>,
}

/// How a [`UserThemePatch`] changes the custom colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomColorsPatch {
    /// Merge these colors over the existing ones.
    Merge(CustomColors),
    /// Drop all custom colors.
    Reset,
}

/// A partial update to a [`UserTheme`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserThemePatch {
    pub user_template: Option<TemplatePatch>,
    pub custom_colors: Option<CustomColorsPatch>,
}

impl UserThemePatch {
    pub fn user_template(template: TemplatePatch) -> Self {
        Self {
            user_template: Some(template),
            custom_colors: None,
        }
    }

    pub fn custom_colors(colors: CustomColors) -> Self {
        Self {
            user_template: None,
            custom_colors: Some(CustomColorsPatch::Merge(colors)),
        }
    }

    pub fn reset_custom_colors() -> Self {
        Self {
            user_template: None,
            custom_colors: Some(CustomColorsPatch::Reset),
        }
    }
}

impl UserTheme {
    /// Merges `patch` into the existing overrides.
    pub fn apply(&mut self, patch: &UserThemePatch) {
        if let Some(template) = &patch.user_template {
            self.user_template
                .get_or_insert_with(TemplatePatch::default)
                .merge(template);
        }
        match &patch.custom_colors {
            Some(CustomColorsPatch::Merge(colors)) => {
                merge_map(self.custom_colors.get_or_insert_with(CustomColors::new), colors);
            }
            Some(CustomColorsPatch::Reset) => self.custom_colors = None,
            None => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_template.is_none() && self.custom_colors.is_none()
    }
}
