//! Format-agnostic document reading and scalar coercion.

use crate::{ProjectError, ProjectResult};
use serde_json::{Map, Value};
use std::path::Path;

/// A configuration object as read from disk.
pub type Document = Map<String, Value>;

/// Read a JSON or YAML file, chosen by extension, into a JSON value.
pub fn read_value(path: &Path) -> ProjectResult<Value> {
    let content = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Read a JSON or YAML object.
pub fn read_document(path: &Path) -> ProjectResult<Document> {
    match read_value(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(ProjectError::invalid(
            path.display().to_string(),
            "top level must be an object",
        )),
    }
}

/// Keys from `required` absent in `map`, in `required` order.
pub(crate) fn missing_keys(map: &Document, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|k| !map.contains_key(**k))
        .map(|k| k.to_string())
        .collect()
}

/// Interpret a value as a float. Booleans map to 0/1 and numeric strings
/// are parsed.
pub(crate) fn as_number(field: &str, value: &Value) -> ProjectResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ProjectError::invalid(field, "number out of range")),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ProjectError::invalid(field, format!("not a number: {s:?}"))),
        other => Err(ProjectError::invalid(
            field,
            format!("expected a number, got {other}"),
        )),
    }
}

pub(crate) fn as_bool(field: &str, value: &Value) -> ProjectResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(_) => Ok(as_number(field, value)? != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ProjectError::invalid(field, format!("not a boolean: {s:?}"))),
        },
        other => Err(ProjectError::invalid(
            field,
            format!("expected a boolean, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_bools_and_numeric_strings() {
        assert_eq!(as_number("a", &json!(2)).unwrap(), 2.0);
        assert_eq!(as_number("a", &json!(true)).unwrap(), 1.0);
        assert_eq!(as_number("a", &json!(" 0.5 ")).unwrap(), 0.5);
        assert!(as_number("a", &json!("abc")).is_err());
        assert!(as_number("a", &json!([1.0])).is_err());
    }

    #[test]
    fn missing_keys_keep_required_order() {
        let map = json!({"b": 1}).as_object().cloned().unwrap();
        assert_eq!(missing_keys(&map, &["a", "b", "c"]), vec!["a", "c"]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = std::env::temp_dir().join("vsc_project_unknown_ext.toml");
        std::fs::write(&path, "x = 1").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, ProjectError::UnsupportedFormat { .. }));
    }
}
