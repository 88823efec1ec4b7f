//! Write operations on [`ExtensionStore`].
//!
//! Every mutator changes the snapshot before returning and persists exactly
//! the top-level keys it touched.

use theme_state_core::{
    BrowserTheme, CssTarget, CustomColors, GeneratedTheme, GeneratedThemePatch, OptionsPatch,
    PywalColors, StateKey, TemplatePatch, ThemeMode, TimeIntervalEndpoint, UserThemePatch,
};

use super::ExtensionStore;
use crate::application::write_queue::PendingWrite;

// ── Structural merges ─────────────────────────────────────────────────────────

impl ExtensionStore {
    /// Merges `patch` into the global template of the resolved mode.
    ///
    /// Both templates are persisted together; the other mode's template is
    /// written back unchanged.
    pub fn update_global_template(&self, patch: TemplatePatch) -> PendingWrite {
        self.commit(&[StateKey::GlobalTemplates], |state| {
            let mode = state.resolve_theme_mode();
            state.global_templates.get_mut(mode).apply(&patch);
            true
        })
    }

    /// Merges `patch` into the generated theme, starting from an empty theme
    /// when none exists.
    pub fn update_generated_theme(&self, patch: GeneratedThemePatch) -> PendingWrite {
        self.commit(&[StateKey::GeneratedTheme], |state| {
            state
                .generated_theme
                .get_or_insert_with(GeneratedTheme::default)
                .apply(&patch);
            true
        })
    }

    /// Merges `patch` into the generated theme's template.  Does nothing when
    /// no theme has been generated.
    pub fn update_generated_template(&self, patch: TemplatePatch) -> PendingWrite {
        self.commit(&[StateKey::GeneratedTheme], |state| match &mut state.generated_theme {
            Some(theme) => {
                theme.template.apply(&patch);
                true
            }
            None => false,
        })
    }

    /// Merges `patch` into the overrides of the current palette in the
    /// resolved mode.  Does nothing when no palette hash is set.
    pub fn update_current_theme(&self, patch: UserThemePatch) -> PendingWrite {
        self.commit(&[StateKey::UserThemes], |state| {
            let mode = state.resolve_theme_mode();
            let Some(hash) = state.pywal_hash.clone() else {
                return false;
            };
            state
                .user_themes
                .entry(hash)
                .or_default()
                .entry(mode)
                .or_default()
                .apply(&patch);
            true
        })
    }

    pub fn update_options(&self, patch: OptionsPatch) -> PendingWrite {
        self.commit(&[StateKey::Options], |state| {
            state.options.apply(&patch);
            true
        })
    }
}

// ── Convenience wrappers ──────────────────────────────────────────────────────

impl ExtensionStore {
    pub fn set_global_template(&self, template: TemplatePatch) -> PendingWrite {
        self.update_global_template(template)
    }

    pub fn set_generated_template(&self, template: TemplatePatch) -> PendingWrite {
        self.update_generated_template(template)
    }

    pub fn set_browser_theme(&self, browser: BrowserTheme) -> PendingWrite {
        self.update_generated_theme(GeneratedThemePatch {
            browser: Some(browser),
            ..GeneratedThemePatch::default()
        })
    }

    pub fn set_user_template(&self, template: TemplatePatch) -> PendingWrite {
        self.update_current_theme(UserThemePatch::user_template(template))
    }

    /// Merges `colors` into the current palette's custom colors.  Earlier
    /// slots are kept.
    pub fn set_custom_colors(&self, colors: CustomColors) -> PendingWrite {
        self.update_current_theme(UserThemePatch::custom_colors(colors))
    }

    pub fn set_duckduckgo_enabled(&self, enabled: bool) -> PendingWrite {
        self.update_options(OptionsPatch {
            duckduckgo: Some(enabled),
            ..OptionsPatch::default()
        })
    }

    pub fn set_darkreader_enabled(&self, enabled: bool) -> PendingWrite {
        self.update_options(OptionsPatch {
            darkreader: Some(enabled),
            ..OptionsPatch::default()
        })
    }

    pub fn set_fetch_on_startup_enabled(&self, enabled: bool) -> PendingWrite {
        self.update_options(OptionsPatch {
            fetch_on_startup: Some(enabled),
            ..OptionsPatch::default()
        })
    }

    pub fn set_interval_start(&self, start: TimeIntervalEndpoint) -> PendingWrite {
        self.update_options(OptionsPatch {
            interval_start: Some(start),
            ..OptionsPatch::default()
        })
    }

    pub fn set_interval_end(&self, end: TimeIntervalEndpoint) -> PendingWrite {
        self.update_options(OptionsPatch {
            interval_end: Some(end),
            ..OptionsPatch::default()
        })
    }

    pub fn set_css_enabled(&self, target: CssTarget, enabled: bool) -> PendingWrite {
        self.update_options(OptionsPatch::css_enabled(target, enabled))
    }

    pub fn set_css_font_size(&self, size: u32) -> PendingWrite {
        self.update_options(OptionsPatch {
            font_size: Some(size),
            ..OptionsPatch::default()
        })
    }
}

// ── Scalar setters ────────────────────────────────────────────────────────────

impl ExtensionStore {
    pub fn set_version(&self, version: f64) -> PendingWrite {
        self.commit(&[StateKey::Version], |state| {
            state.version = version;
            true
        })
    }

    pub fn set_connected(&self, connected: bool) -> PendingWrite {
        self.commit(&[StateKey::Connected], |state| {
            state.connected = connected;
            true
        })
    }

    pub fn set_update_muted(&self, muted: bool) -> PendingWrite {
        self.commit(&[StateKey::UpdateMuted], |state| {
            state.update_muted = muted;
            true
        })
    }

    pub fn set_applied(&self, applied: bool) -> PendingWrite {
        self.commit(&[StateKey::IsApplied], |state| {
            state.is_applied = applied;
            true
        })
    }

    pub fn set_pywal_colors(&self, colors: Option<PywalColors>) -> PendingWrite {
        self.commit(&[StateKey::PywalColors], |state| {
            state.pywal_colors = colors;
            true
        })
    }

    pub fn set_pywal_hash(&self, hash: Option<String>) -> PendingWrite {
        self.commit(&[StateKey::PywalHash], |state| {
            state.pywal_hash = hash;
            true
        })
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> PendingWrite {
        self.commit(&[StateKey::Mode], |state| {
            state.mode = mode;
            true
        })
    }

    pub fn set_is_day(&self, is_day: bool) -> PendingWrite {
        self.commit(&[StateKey::IsDay], |state| {
            state.is_day = is_day;
            true
        })
    }

    /// Replaces the generated theme wholesale.
    pub fn set_generated_theme(&self, theme: Option<GeneratedTheme>) -> PendingWrite {
        self.commit(&[StateKey::GeneratedTheme], |state| {
            state.generated_theme = theme;
            true
        })
    }
}

// ── Resets ────────────────────────────────────────────────────────────────────

impl ExtensionStore {
    /// Drops the custom colors of the current palette in the resolved mode.
    pub fn reset_custom_colors(&self) -> PendingWrite {
        self.update_current_theme(UserThemePatch::reset_custom_colors())
    }

    pub fn reset_generated_theme(&self) -> PendingWrite {
        self.set_generated_theme(None)
    }
}
