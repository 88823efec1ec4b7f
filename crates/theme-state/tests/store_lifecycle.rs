//! Integration tests for `ExtensionStore` over the shipped storage adapters.
//!
//! Each test builds its own store and backend, so they run independently.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use theme_state::infrastructure::storage::{JsonFileBackend, MemoryBackend};
use theme_state::{ExtensionStore, LoadOutcome, StorageBackend, StorageMap};
use theme_state_core::{
    CssTarget, CustomColors, ExtensionState, GeneratedTheme, StateKey, TemplateMode, TemplatePatch,
    ThemeMode, ThemeTemplate, TimeIntervalEndpoint, UserTheme, STATE_VERSION,
};
use uuid::Uuid;

fn colors(pairs: &[(&str, &str)]) -> CustomColors {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A backend holding the current-schema default state, so `load()` performs
/// no migration writes.
async fn current_store() -> (ExtensionStore, Arc<MemoryBackend>) {
    let seeded = ExtensionState {
        state_version: STATE_VERSION,
        ..ExtensionState::default()
    };
    let backend = Arc::new(MemoryBackend::with_items(seeded.to_storage_map().unwrap()));
    let store = ExtensionStore::new(backend.clone());
    assert_eq!(store.load().await.unwrap(), LoadOutcome::Current);
    (store, backend)
}

// ── Mode resolution ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_auto_mode_follows_day_signal() {
    // Arrange
    let (store, _) = current_store().await;

    // Act
    store.set_theme_mode(ThemeMode::Auto).await.unwrap();
    store.set_is_day(true).await.unwrap();

    // Assert
    assert_eq!(store.resolve_theme_mode(), TemplateMode::Light);
    store.set_is_day(false).await.unwrap();
    assert_eq!(store.resolve_theme_mode(), TemplateMode::Dark);
}

#[tokio::test]
async fn test_generated_template_falls_back_to_global_template() {
    let (store, _) = current_store().await;

    assert_eq!(store.get_generated_template(), ThemeTemplate::builtin_dark());

    let mut theme = GeneratedTheme::default();
    theme.template.palette.insert("background".into(), 7);
    store.set_generated_theme(Some(theme.clone())).await.unwrap();
    assert_eq!(store.get_generated_template(), theme.template);

    store.reset_generated_theme().await.unwrap();
    assert_eq!(store.get_generated_template(), ThemeTemplate::builtin_dark());
}

// ── User themes ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_custom_colors_are_scoped_to_the_resolved_mode() {
    // Arrange
    let (store, backend) = current_store().await;
    store.set_pywal_hash(Some("abc123".into())).await.unwrap();

    // Act
    store
        .set_custom_colors(colors(&[("background", "#000")]))
        .await
        .unwrap();

    // Assert
    let expected = UserTheme {
        user_template: None,
        custom_colors: Some(colors(&[("background", "#000")])),
    };
    assert_eq!(store.get_user_theme(), expected);
    assert_eq!(
        backend.items().await["userThemes"],
        json!({ "abc123": { "dark": { "customColors": { "background": "#000" } } } })
    );

    store.set_theme_mode(ThemeMode::Light).await.unwrap();
    assert_eq!(store.get_user_theme(), UserTheme::default());
}

#[tokio::test]
async fn test_custom_colors_accumulate_across_calls() {
    let (store, _) = current_store().await;
    store.set_pywal_hash(Some("abc123".into())).await.unwrap();

    store.set_custom_colors(colors(&[("background", "#000")])).await.unwrap();
    store.set_custom_colors(colors(&[("foreground", "#fff")])).await.unwrap();

    assert_eq!(
        store.get_user_theme().custom_colors,
        Some(colors(&[("background", "#000"), ("foreground", "#fff")]))
    );
}

#[tokio::test]
async fn test_reset_custom_colors_keeps_user_template() {
    // Arrange
    let (store, _) = current_store().await;
    store.set_pywal_hash(Some("abc123".into())).await.unwrap();
    store
        .set_user_template(TemplatePatch::default().with_palette_slot("accent", 4))
        .await
        .unwrap();
    store.set_custom_colors(colors(&[("accent", "#f00")])).await.unwrap();

    // Act
    store.reset_custom_colors().await.unwrap();

    // Assert
    let theme = store.get_user_theme();
    assert_eq!(theme.custom_colors, None);
    assert!(theme.user_template.is_some());
}

#[tokio::test]
async fn test_user_theme_is_empty_without_hash() {
    let (store, backend) = current_store().await;
    let writes_before = backend.set_count();

    let pending = store.set_custom_colors(colors(&[("background", "#000")]));

    assert!(pending.is_noop());
    pending.await.unwrap();
    assert_eq!(store.get_user_theme(), UserTheme::default());
    assert_eq!(backend.set_count(), writes_before);
}

// ── Templates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_global_template_update_leaves_other_mode_unchanged() {
    // Arrange
    let (store, backend) = current_store().await;
    store.set_theme_mode(ThemeMode::Light).await.unwrap();

    // Act
    store
        .update_global_template(TemplatePatch::default().with_palette_slot("background", 15))
        .await
        .unwrap();

    // Assert: in memory
    let snapshot = store.snapshot();
    assert_eq!(snapshot.global_templates.dark, ThemeTemplate::builtin_dark());
    assert_eq!(snapshot.global_templates.light.palette["background"], 15);

    // Assert: in the backend
    let persisted = &backend.items().await["globalTemplates"];
    assert_eq!(persisted["dark"], serde_json::to_value(ThemeTemplate::builtin_dark()).unwrap());
    assert_eq!(persisted["light"]["palette"]["background"], json!(15));
}

#[tokio::test]
async fn test_browser_theme_creates_generated_theme() {
    let (store, _) = current_store().await;
    let mut browser = theme_state_core::BrowserTheme::default();
    browser.colors.insert("toolbar".into(), "#101010".into());

    store.set_browser_theme(browser.clone()).await.unwrap();

    let theme = store.get_generated_theme().unwrap();
    assert_eq!(theme.browser, browser);
    assert_eq!(theme.template, ThemeTemplate::default());
}

// ── Options ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_font_size_update_changes_nothing_else() {
    // Arrange
    let (store, backend) = current_store().await;
    let before = store.snapshot().options;

    // Act
    store.set_css_font_size(20).await.unwrap();

    // Assert
    let after = store.snapshot().options;
    assert_eq!(after.font_size, 20);
    assert_eq!(
        theme_state_core::ExtensionOptions {
            font_size: before.font_size,
            ..after
        },
        before
    );
    assert_eq!(backend.items().await["options"]["fontSize"], json!(20));
}

#[tokio::test]
async fn test_option_setters_round_trip_through_accessors() {
    let (store, _) = current_store().await;

    store.set_css_enabled(CssTarget::UserContent, true).await.unwrap();
    store.set_duckduckgo_enabled(true).await.unwrap();
    store.set_darkreader_enabled(true).await.unwrap();
    store.set_fetch_on_startup_enabled(true).await.unwrap();
    store.set_interval_start(TimeIntervalEndpoint::new(7, 15)).await.unwrap();
    store.set_interval_end(TimeIntervalEndpoint::new(20, 0)).await.unwrap();

    assert!(store.get_css_enabled(CssTarget::UserContent));
    assert!(!store.get_css_enabled(CssTarget::UserChrome));
    assert!(store.get_duckduckgo_enabled());
    assert!(store.get_darkreader_enabled());
    assert!(store.get_fetch_on_startup_enabled());
    let (start, end) = store.get_interval();
    assert_eq!(start.string_format, "07:15");
    assert_eq!(end.string_format, "20:00");
}

#[tokio::test]
async fn test_default_options_data_reports_values() {
    let (store, _) = current_store().await;

    let data = serde_json::to_value(store.get_options_data()).unwrap();

    assert_eq!(data.as_array().unwrap().len(), 8);
    assert_eq!(data[0], json!({ "option": "userChrome", "enabled": false }));
    assert_eq!(data[2], json!({ "option": "fontSize", "enabled": true, "value": 13 }));
    assert_eq!(
        data[6],
        json!({
            "option": "intervalStart",
            "enabled": true,
            "value": { "hour": 10, "minute": 0, "stringFormat": "10:00" }
        })
    );
}

// ── Idempotence ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_repeated_mutation_yields_same_snapshot() {
    let (store, _) = current_store().await;
    store.set_pywal_hash(Some("abc123".into())).await.unwrap();
    let patch = TemplatePatch::default()
        .with_palette_slot("text", 15)
        .with_browser_target("toolbar", "background");

    store.set_user_template(patch.clone()).await.unwrap();
    store.update_global_template(patch.clone()).await.unwrap();
    let once = store.snapshot();
    store.set_user_template(patch.clone()).await.unwrap();
    store.update_global_template(patch).await.unwrap();

    assert_eq!(store.snapshot(), once);
}

// ── Loader / migration ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_legacy_state_is_replaced_and_second_load_is_quiet() {
    // Arrange: pre-versioning state
    let mut legacy = StorageMap::new();
    legacy.insert("stateVersion".into(), json!(0.0));
    legacy.insert("mode".into(), json!("light"));
    legacy.insert("theme".into(), json!({ "colors": ["#000000"] }));
    let backend = Arc::new(MemoryBackend::with_items(legacy));
    let store = ExtensionStore::new(backend.clone());

    // Act
    let outcome = store.load().await.unwrap();

    // Assert: cleared, then rewritten with exactly the default state
    assert_eq!(outcome, LoadOutcome::Migrated { from: 0.0 });
    assert_eq!(backend.clear_count(), 1);
    assert_eq!(backend.set_count(), 1);
    let expected = ExtensionState {
        state_version: STATE_VERSION,
        ..ExtensionState::default()
    };
    assert_eq!(backend.items().await, expected.to_storage_map().unwrap());
    assert_eq!(store.snapshot(), expected);

    // Act again on a fresh store over the same backend
    let reloaded = ExtensionStore::new(backend.clone());
    assert_eq!(reloaded.load().await.unwrap(), LoadOutcome::Current);
    assert_eq!(backend.clear_count(), 1);
    assert_eq!(backend.set_count(), 1);
}

#[tokio::test]
async fn test_empty_backend_is_treated_as_legacy() {
    let backend = Arc::new(MemoryBackend::new());
    let store = ExtensionStore::new(backend.clone());

    let outcome = store.load().await.unwrap();

    assert_eq!(outcome, LoadOutcome::Migrated { from: 0.0 });
    assert_eq!(
        backend.items().await.len(),
        StateKey::ALL.len(),
        "every key must be written"
    );
}

#[tokio::test]
async fn test_unrecognised_version_is_left_untouched() {
    // Arrange
    let mut items = StorageMap::new();
    items.insert("stateVersion".into(), json!(7.0));
    items.insert("pywalHash".into(), json!("ffee"));
    let backend = Arc::new(MemoryBackend::with_items(items.clone()));
    let store = ExtensionStore::new(backend.clone());

    // Act
    let outcome = store.load().await.unwrap();

    // Assert
    assert_eq!(outcome, LoadOutcome::UnrecognisedVersion { found: json!(7.0) });
    assert_eq!(backend.clear_count(), 0);
    assert_eq!(backend.set_count(), 0);
    assert_eq!(backend.items().await, items);
    assert_eq!(store.get_pywal_hash().as_deref(), Some("ffee"));
}

#[tokio::test]
async fn test_non_numeric_state_version_keeps_stored_data() {
    for version in [json!(null), json!("2.0")] {
        // Arrange: current-shape data whose version is not a number
        let mut items = ExtensionState {
            state_version: STATE_VERSION,
            ..ExtensionState::default()
        }
        .to_storage_map()
        .unwrap();
        items.insert("stateVersion".into(), version.clone());
        items.insert("pywalHash".into(), json!("ffee"));
        items.insert(
            "userThemes".into(),
            json!({ "ffee": { "dark": { "customColors": { "background": "#000" } } } }),
        );
        let backend = Arc::new(MemoryBackend::with_items(items.clone()));
        let store = ExtensionStore::new(backend.clone());

        // Act
        let outcome = store.load().await.unwrap();

        // Assert: reported, never cleared or rewritten
        assert_eq!(outcome, LoadOutcome::UnrecognisedVersion { found: version });
        assert_eq!(backend.clear_count(), 0);
        assert_eq!(backend.set_count(), 0);
        assert_eq!(backend.items().await, items);
        assert_eq!(
            store.get_user_theme().custom_colors,
            Some(colors(&[("background", "#000")]))
        );
    }
}

#[tokio::test]
async fn test_stored_options_missing_a_field_survive_load() {
    // Arrange: options written before fetchOnStartup existed
    let mut items = ExtensionState {
        state_version: STATE_VERSION,
        ..ExtensionState::default()
    }
    .to_storage_map()
    .unwrap();
    items.insert(
        "options".into(),
        json!({
            "userChrome": false,
            "userContent": false,
            "fontSize": 20,
            "duckduckgo": true,
            "darkreader": false,
            "intervalStart": { "hour": 10, "minute": 0, "stringFormat": "10:00" },
            "intervalEnd": { "hour": 19, "minute": 0, "stringFormat": "19:00" }
        }),
    );
    let store = ExtensionStore::new(Arc::new(MemoryBackend::with_items(items)));

    // Act
    let outcome = store.load().await.unwrap();

    // Assert
    assert_eq!(outcome, LoadOutcome::Current);
    assert_eq!(store.get_css_font_size(), 20);
    assert!(store.get_duckduckgo_enabled());
    assert!(!store.get_fetch_on_startup_enabled());
}

#[tokio::test]
async fn test_malformed_global_templates_fall_back_to_builtins() {
    let mut items = ExtensionState {
        state_version: STATE_VERSION,
        mode: ThemeMode::Light,
        ..ExtensionState::default()
    }
    .to_storage_map()
    .unwrap();
    items.insert("globalTemplates".into(), json!({ "auto": {} }));
    let store = ExtensionStore::new(Arc::new(MemoryBackend::with_items(items)));

    store.load().await.unwrap();

    assert_eq!(store.get_theme_mode(), ThemeMode::Light);
    assert_eq!(store.get_global_template(), ThemeTemplate::builtin_light());
}

// ── Initial data ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_initial_data_bundles_current_view() {
    let (store, _) = current_store().await;
    store.set_version(2.3).await.unwrap();
    store.set_connected(true).await.unwrap();
    store.set_applied(true).await.unwrap();
    store
        .set_pywal_colors(Some(vec!["#000000".into(), "#ffffff".into()]))
        .await
        .unwrap();

    let data = store.get_initial_data();

    assert_eq!(data.debugging_info, store.get_debugging_info());
    assert_eq!(data.debugging_info.version, 2.3);
    assert!(data.debugging_info.connected);
    assert!(data.is_applied);
    assert_eq!(data.pywal_colors, store.get_pywal_colors());
    assert_eq!(data.template, store.get_generated_template());
    assert_eq!(data.theme_mode, ThemeMode::Dark);
    assert_eq!(data.template_theme_mode, TemplateMode::Dark);
    assert_eq!(data.user_theme, UserTheme::default());
}

#[tokio::test]
async fn test_update_muted_is_persisted() {
    let (store, backend) = current_store().await;

    store.set_update_muted(true).await.unwrap();

    assert!(store.get_update_muted());
    assert_eq!(backend.items().await["updateMuted"], json!(true));
}

// ── Change events ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_store_subscribes_to_backend_changes() {
    // Arrange
    let backend = Arc::new(MemoryBackend::new());
    assert_eq!(backend.subscriber_count(), 0);

    // Act
    let store = ExtensionStore::new(backend.clone());

    // Assert
    assert_eq!(backend.subscriber_count(), 1);
    drop(store);
}

#[tokio::test]
async fn test_store_writes_are_published_as_change_events() {
    // Arrange
    let (store, backend) = current_store().await;
    let mut events = backend.subscribe();
    assert_eq!(backend.subscriber_count(), 2);

    // Act
    store.set_theme_mode(ThemeMode::Light).await.unwrap();

    // Assert
    let change = events.recv().await.unwrap();
    assert_eq!(change.area_name, "local");
    assert_eq!(change.changed_keys(), vec!["mode"]);
    assert_eq!(change.changes["mode"].new_value, Some(json!("light")));
}

// ── JSON file backend ─────────────────────────────────────────────────────────

fn temp_state_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("theme-state-it-{}", Uuid::new_v4()))
        .join("state.json")
}

#[tokio::test]
async fn test_state_survives_restart_with_json_file() {
    // Arrange
    let path = temp_state_file();
    {
        let store = ExtensionStore::new(Arc::new(JsonFileBackend::new(&path)));
        store.load().await.unwrap();
        store.set_theme_mode(ThemeMode::Auto).await.unwrap();
        store.set_pywal_hash(Some("cafe".into())).await.unwrap();
        store.set_custom_colors(colors(&[("text", "#eee")])).await.unwrap();
    }

    // Act
    let store = ExtensionStore::new(Arc::new(JsonFileBackend::new(&path)));
    let outcome = store.load().await.unwrap();

    // Assert
    assert_eq!(outcome, LoadOutcome::Current);
    assert_eq!(store.get_theme_mode(), ThemeMode::Auto);
    assert_eq!(
        store.get_user_theme().custom_colors,
        Some(colors(&[("text", "#eee")]))
    );

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_json_file_backend_reports_changes_to_subscribers() {
    let path = temp_state_file();
    let backend = JsonFileBackend::new(&path);
    let mut events = backend.subscribe();

    let mut items = StorageMap::new();
    items.insert("isDay".into(), json!(true));
    backend.set(items).await.unwrap();

    let change = events.recv().await.unwrap();
    assert_eq!(change.area_name, "local");
    assert_eq!(change.changed_keys(), vec!["isDay"]);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
