//! Object path extraction for plugin field mappings
//!
//! Supports a small JSONPath subset:
//! - `.field` - access object field
//! - `.field.subfield` - nested access
//! - `[index]` - array access
//! - `["key"]` / `['key']` - field whose name contains dots or slashes

use serde_json::Value;

/// One step of a parsed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// Parse a path into segments
///
/// Returns `None` for malformed paths (unclosed brackets, non-numeric
/// unquoted indexes).
pub fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = path.trim();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']')?;
            let inner = after[..close].trim();
            let quoted = inner
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')));
            match quoted {
                Some(key) => segments.push(Segment::Field(key.to_string())),
                None => segments.push(Segment::Index(inner.parse().ok()?)),
            }
            rest = &after[close + 1..];
        } else {
            let body = rest.strip_prefix('.').unwrap_or(rest);
            let end = body.find(['.', '[']).unwrap_or(body.len());
            let field = &body[..end];
            if !field.is_empty() {
                segments.push(Segment::Field(field.to_string()));
            }
            rest = &body[end..];
        }
    }

    Some(segments)
}

/// Resolve a path against an object
pub fn extract<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
    parse_path(path)?
        .iter()
        .try_fold(obj, |current, segment| match segment {
            Segment::Field(name) => current.get(name.as_str()),
            Segment::Index(i) => current.as_array()?.get(*i),
        })
}

/// Resolve a path to a display string
///
/// Scalars are stringified; null, objects and arrays are absent.
pub fn extract_string(obj: &Value, path: &str) -> Option<String> {
    match extract(obj, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolve a path to a tag list
///
/// Arrays keep their string elements; strings are split on commas.
pub fn extract_tags(obj: &Value, path: &str) -> Vec<String> {
    match extract(obj, path) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "metadata": {
                "name": "etcd",
                "annotations": {"openshift.io/display-name": "etcd Operator"}
            },
            "spec": {
                "version": 3,
                "keywords": ["database", "", "kv"],
                "owners": [{"name": "CoreOS"}]
            }
        })
    }

    #[test]
    fn test_nested_field() {
        assert_eq!(extract_string(&sample(), ".metadata.name").as_deref(), Some("etcd"));
        assert_eq!(extract_string(&sample(), "metadata.name").as_deref(), Some("etcd"));
    }

    #[test]
    fn test_array_index() {
        assert_eq!(
            extract_string(&sample(), ".spec.owners[0].name").as_deref(),
            Some("CoreOS")
        );
        assert_eq!(extract(&sample(), ".spec.owners[3].name"), None);
    }

    #[test]
    fn test_quoted_key() {
        assert_eq!(
            extract_string(&sample(), r#".metadata.annotations["openshift.io/display-name"]"#)
                .as_deref(),
            Some("etcd Operator")
        );
    }

    #[test]
    fn test_number_is_stringified() {
        assert_eq!(extract_string(&sample(), ".spec.version").as_deref(), Some("3"));
        assert_eq!(extract_string(&sample(), ".spec"), None);
    }

    #[test]
    fn test_tags_from_array_and_string() {
        assert_eq!(extract_tags(&sample(), ".spec.keywords"), vec!["database", "kv"]);
        let obj = json!({"tags": "a, b,,c"});
        assert_eq!(extract_tags(&obj, ".tags"), vec!["a", "b", "c"]);
        assert!(extract_tags(&obj, ".missing").is_empty());
    }

    #[test]
    fn test_malformed_paths() {
        assert_eq!(parse_path(".spec[abc]"), None);
        assert_eq!(parse_path(".spec[0"), None);
        assert_eq!(parse_path(""), Some(Vec::new()));
    }
}
