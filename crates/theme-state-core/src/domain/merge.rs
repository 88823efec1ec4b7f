//! Key-wise map merging shared by the per-entity patch types.

use std::collections::BTreeMap;

/// Copies every entry of `patch` into `target`, overwriting existing keys.
pub(crate) fn merge_map<V: Clone>(target: &mut BTreeMap<String, V>, patch: &BTreeMap<String, V>) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

/// Merges an optional patch section into an optional target section.
///
/// An absent target is treated as empty, so the result is `Some` whenever
/// either side is.
pub(crate) fn merge_optional_map<V: Clone>(
    target: &mut Option<BTreeMap<String, V>>,
    patch: &Option<BTreeMap<String, V>>,
) {
    if let Some(patch) = patch {
        merge_map(target.get_or_insert_with(BTreeMap::new), patch);
    }
}
