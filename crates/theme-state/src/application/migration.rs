//! Schema-version reconciliation run by [`ExtensionStore::load`].
//!
//! Only one historical schema is recognised: state written before versioning
//! existed, which carries `stateVersion = 0.0` (or no `stateVersion` at all).
//! Such state is not carried forward; the backend is cleared and rewritten
//! with the defaults.  Any other value, numeric or not, is left untouched and
//! reported to the caller.
//!
//! [`ExtensionStore::load`]: super::store::ExtensionStore::load

use serde::Serialize;
use serde_json::Value;
use theme_state_core::{ExtensionState, LEGACY_STATE_VERSION, STATE_VERSION};

/// What `load()` found and did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum LoadOutcome {
    /// Persisted state already uses the current schema.
    Current,
    /// Legacy state was discarded and replaced with the defaults.
    Migrated { from: f64 },
    /// Persisted state carries a version this build does not know, or one
    /// that is not a number.  Nothing was written; the loaded values are in
    /// use as-is.
    UnrecognisedVersion { found: Value },
}

/// Decides what to do with the persisted `stateVersion`.
///
/// Only an absent key or the number `0.0` counts as legacy.  A value of the
/// wrong type is never treated as legacy, so it cannot trigger a clear.
pub fn classify(found: Option<&Value>) -> LoadOutcome {
    let Some(found) = found else {
        return LoadOutcome::Migrated {
            from: LEGACY_STATE_VERSION,
        };
    };
    match found.as_f64() {
        Some(version) if version == STATE_VERSION => LoadOutcome::Current,
        Some(version) if version == LEGACY_STATE_VERSION => LoadOutcome::Migrated { from: version },
        _ => LoadOutcome::UnrecognisedVersion {
            found: found.clone(),
        },
    }
}

/// Builds the state written after clearing legacy storage.
///
/// No legacy data is transferred: the result is the default state stamped
/// with the current schema version, so the next load recognises it.
pub fn migrate_legacy() -> ExtensionState {
    ExtensionState {
        state_version: STATE_VERSION,
        ..ExtensionState::default()
    }
}
