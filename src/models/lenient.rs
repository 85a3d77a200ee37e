//! Tolerant field deserializers
//!
//! Catalog sources are loosely shaped: chart indexes carry unquoted numeric
//! versions and broker metadata is free-form. These helpers turn a field of the
//! wrong shape into an absent value instead of failing the whole resource.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Render a scalar as a string; anything else is absent
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `Option<String>` that accepts numbers/bools and ignores other shapes
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// `String` that falls back to empty on wrong shapes
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// List of strings; non-scalar entries are dropped, non-lists become empty
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    })
}

/// String map; non-scalar values are dropped, non-objects become empty
pub fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        version: Option<String>,
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "string_map")]
        labels: BTreeMap<String, String>,
    }

    #[test]
    fn test_numbers_become_strings() {
        let probe: Probe = serde_json::from_value(json!({"version": 1.5})).unwrap();
        assert_eq!(probe.version.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_wrong_shapes_degrade_to_empty() {
        let probe: Probe = serde_json::from_value(json!({
            "version": {"nested": true},
            "tags": "not-a-list",
            "labels": ["x"],
        }))
        .unwrap();
        assert_eq!(probe.version, None);
        assert!(probe.tags.is_empty());
        assert!(probe.labels.is_empty());
    }

    #[test]
    fn test_mixed_lists_keep_scalars() {
        let probe: Probe = serde_json::from_value(json!({
            "tags": ["web", {"x": 1}, 3],
            "labels": {"a": "b", "c": null}
        }))
        .unwrap();
        assert_eq!(probe.tags, vec!["web", "3"]);
        assert_eq!(probe.labels.len(), 1);
    }

    #[test]
    fn test_missing_fields() {
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.version, None);
        assert!(probe.tags.is_empty());
    }
}
