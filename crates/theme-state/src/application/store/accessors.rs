//! Read operations on [`ExtensionStore`].  All return owned values.

use theme_state_core::{
    CssTarget, DebuggingInfo, ExtensionState, GeneratedTheme, InitialData, OptionSetData,
    PywalColors, TemplateMode, ThemeMode, ThemeTemplate, TimeIntervalEndpoint, UserTheme,
};

use super::ExtensionStore;

impl ExtensionStore {
    /// A copy of the whole snapshot.
    pub fn snapshot(&self) -> ExtensionState {
        self.state().clone()
    }

    /// The mode used for template and override lookups.  Never `Auto`.
    pub fn resolve_theme_mode(&self) -> TemplateMode {
        self.state().resolve_theme_mode()
    }

    /// The generated theme's template, falling back to the global template
    /// of the resolved mode.
    pub fn get_generated_template(&self) -> ThemeTemplate {
        self.state().generated_template().clone()
    }

    pub fn get_global_template(&self) -> ThemeTemplate {
        self.state().global_template().clone()
    }

    /// Overrides for the current palette in the resolved mode; empty when
    /// there are none.
    pub fn get_user_theme(&self) -> UserTheme {
        self.state().user_theme().cloned().unwrap_or_default()
    }

    pub fn get_options_data(&self) -> Vec<OptionSetData> {
        self.state().options_data()
    }

    pub fn get_interval(&self) -> (TimeIntervalEndpoint, TimeIntervalEndpoint) {
        let state = self.state();
        let (start, end) = state.interval();
        (start.clone(), end.clone())
    }

    pub fn get_debugging_info(&self) -> DebuggingInfo {
        self.state().debugging_info()
    }

    pub fn get_initial_data(&self) -> InitialData {
        self.state().initial_data()
    }

    pub fn get_version(&self) -> f64 {
        self.state().version
    }

    pub fn get_connected(&self) -> bool {
        self.state().connected
    }

    pub fn get_update_muted(&self) -> bool {
        self.state().update_muted
    }

    pub fn get_theme_mode(&self) -> ThemeMode {
        self.state().mode
    }

    pub fn get_is_day(&self) -> bool {
        self.state().is_day
    }

    pub fn get_applied(&self) -> bool {
        self.state().is_applied
    }

    pub fn get_pywal_colors(&self) -> Option<PywalColors> {
        self.state().pywal_colors.clone()
    }

    pub fn get_pywal_hash(&self) -> Option<String> {
        self.state().pywal_hash.clone()
    }

    pub fn get_generated_theme(&self) -> Option<GeneratedTheme> {
        self.state().generated_theme.clone()
    }

    pub fn get_duckduckgo_enabled(&self) -> bool {
        self.state().options.duckduckgo
    }

    pub fn get_darkreader_enabled(&self) -> bool {
        self.state().options.darkreader
    }

    pub fn get_fetch_on_startup_enabled(&self) -> bool {
        self.state().options.fetch_on_startup
    }

    pub fn get_css_font_size(&self) -> u32 {
        self.state().options.font_size
    }

    pub fn get_css_enabled(&self, target: CssTarget) -> bool {
        self.state().options.css_enabled(target)
    }
}
