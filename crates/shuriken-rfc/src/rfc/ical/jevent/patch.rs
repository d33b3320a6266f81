//! Flat, top-level-only JSON merge-patch utilities for the recurrence
//! overrides table. This is deliberately not RFC 6902 JSON Patch and not a
//! recursive merge-patch: only top-level keys are diffed and applied, matching
//! the shallow override semantics calendar clients expect.

use serde_json::{Map, Value};

/// Produces the set of top-level keys where `overlay` differs from `base`,
/// each mapped to its value in `overlay`. Keys present in `base` but absent
/// from `overlay` are not represented (there is no top-level "delete"
/// marker in this flat scheme).
#[must_use]
pub fn diff(base: &Value, overlay: &Value) -> Map<String, Value> {
    let mut patch = Map::new();

    let (Some(base_map), Some(overlay_map)) = (base.as_object(), overlay.as_object()) else {
        return patch;
    };

    for (key, overlay_value) in overlay_map {
        if base_map.get(key) != Some(overlay_value) {
            patch.insert(key.clone(), overlay_value.clone());
        }
    }

    patch
}

/// Applies a flat patch onto `base`, overwriting each top-level key the patch
/// names and leaving every other key untouched.
#[must_use]
pub fn apply(base: &Value, patch: &Map<String, Value>) -> Value {
    let mut result = base.as_object().cloned().unwrap_or_default();
    for (key, value) in patch {
        result.insert(key.clone(), value.clone());
    }
    Value::Object(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diff_reports_only_changed_top_level_keys() {
        let base = json!({"title": "Standup", "priority": 5, "keywords": ["a"]});
        let overlay = json!({"title": "Standup (moved)", "priority": 5, "keywords": ["a"]});

        let patch = diff(&base, &overlay);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("title"), Some(&json!("Standup (moved)")));
    }

    #[test]
    fn apply_overwrites_named_keys_only() {
        let base = json!({"title": "Standup", "priority": 5});
        let mut patch = Map::new();
        patch.insert("title".to_string(), json!("Standup (moved)"));

        let merged = apply(&base, &patch);
        assert_eq!(merged, json!({"title": "Standup (moved)", "priority": 5}));
    }

    #[test]
    fn diff_is_empty_for_identical_documents() {
        let base = json!({"a": 1, "b": [1, 2, 3]});
        assert!(diff(&base, &base).is_empty());
    }
}
