//! JSON payload helpers shared by store adapters
//!
//! - [`extract`] walks a dot-separated property path into a JSON document
//! - [`decode_flat_map`] turns a flat JSON object into string key/value pairs
//!
//! Property paths are object keys joined by `.`. A backslash escapes the next
//! character, so `db\.host` addresses the single key `db.host`.
//! A trailing backslash with nothing to escape is kept as a literal `\`.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error decoding a payload as a flat key/value map
#[derive(Debug, Error)]
pub enum MapDecodeError {
    /// Payload is not a JSON object
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A field holds an object or array
    #[error("field '{field}' is not a scalar value")]
    NotScalar {
        /// Offending field name
        field: String,
    },
}

fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => current.push(chars.next().unwrap_or('\\')),
            '.' => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    segments.push(current);
    segments
}

/// Resolve `path` inside the JSON document `payload`.
///
/// Returns `None` when the payload is not valid JSON, a segment is missing,
/// or a non-object value is reached before the path is exhausted. Callers
/// treat all three the same way.
#[must_use]
pub fn extract(payload: &[u8], path: &str) -> Option<Value> {
    let root: Value = serde_json::from_slice(payload).ok()?;

    split_path(path)
        .into_iter()
        .try_fold(root, |value, segment| match value {
            Value::Object(mut fields) => fields.remove(&segment),
            _ => None,
        })
}

/// Render an extracted value as secret bytes.
///
/// Strings yield their contents; anything else yields its compact JSON text.
#[must_use]
pub fn value_bytes(value: Value) -> Vec<u8> {
    match value {
        Value::String(s) => s.into_bytes(),
        other => other.to_string().into_bytes(),
    }
}

/// Decode `payload` as a flat JSON object.
///
/// Numbers and booleans keep their JSON text, `null` becomes an empty
/// string. Nested objects and arrays are rejected.
///
/// # Errors
/// Returns [`MapDecodeError`] when the payload is not a JSON object or a
/// field is not a scalar.
pub fn decode_flat_map(payload: &[u8]) -> Result<HashMap<String, String>, MapDecodeError> {
    let fields: serde_json::Map<String, Value> = serde_json::from_slice(payload)?;

    fields
        .into_iter()
        .map(|(field, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(MapDecodeError::NotScalar { field });
                }
            };
            Ok((field, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_top_level_key() {
        let value = extract(br#"{"/shmoo": "bang"}"#, "/shmoo");
        assert_eq!(value, Some(json!("bang")));
    }

    #[test]
    fn test_extract_nested_key() {
        let value = extract(br#"{"foobar":{"baz":"nestedval"}}"#, "foobar.baz");
        assert_eq!(value, Some(json!("nestedval")));
    }

    #[test]
    fn test_extract_missing_key() {
        assert_eq!(extract(br#"{"/shmoo": "bang"}"#, "INVALPROP"), None);
    }

    #[test]
    fn test_extract_malformed_json() {
        assert_eq!(extract(b"------", "INVALPROP"), None);
    }

    #[test]
    fn test_extract_through_scalar_fails() {
        assert_eq!(extract(br#"{"foobar":"flat"}"#, "foobar.baz"), None);
    }

    #[test]
    fn test_extract_does_not_index_arrays() {
        assert_eq!(extract(br#"{"list":["a","b"]}"#, "list.0"), None);
    }

    #[test]
    fn test_extract_escaped_dot() {
        let payload = br#"{"db.host":"localhost","db":{"host":"remote"}}"#;
        assert_eq!(extract(payload, r"db\.host"), Some(json!("localhost")));
        assert_eq!(extract(payload, "db.host"), Some(json!("remote")));
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        assert_eq!(split_path(r"a\"), vec![r"a\".to_string()]);
        assert_eq!(split_path(r"a.b\"), vec!["a".to_string(), r"b\".to_string()]);
        assert_eq!(extract(br#"{"a\\":"x"}"#, r"a\"), Some(json!("x")));
        assert_eq!(extract(br#"{"a":"x"}"#, r"a\"), None);
    }

    #[test]
    fn test_extract_object_value() {
        let value = extract(br#"{"a":{"b":1}}"#, "a").unwrap();
        assert_eq!(value_bytes(value), br#"{"b":1}"#.to_vec());
    }

    #[test]
    fn test_value_bytes_string_is_unquoted() {
        assert_eq!(value_bytes(json!("bang")), b"bang".to_vec());
        assert_eq!(value_bytes(json!(42)), b"42".to_vec());
        assert_eq!(value_bytes(json!(true)), b"true".to_vec());
    }

    #[test]
    fn test_decode_flat_map() {
        let map = decode_flat_map(br#"{"foo":"bar"}"#).unwrap();
        assert_eq!(map, HashMap::from([("foo".to_string(), "bar".to_string())]));
    }

    #[test]
    fn test_decode_flat_map_coerces_scalars() {
        let map = decode_flat_map(br#"{"port":5432,"tls":true,"note":null}"#).unwrap();
        assert_eq!(map.get("port").map(String::as_str), Some("5432"));
        assert_eq!(map.get("tls").map(String::as_str), Some("true"));
        assert_eq!(map.get("note").map(String::as_str), Some(""));
    }

    #[test]
    fn test_decode_flat_map_rejects_nested() {
        let err = decode_flat_map(br#"{"foobar":{"baz":"nestedval"}}"#).unwrap_err();
        assert!(matches!(err, MapDecodeError::NotScalar { ref field } if field == "foobar"));
    }

    #[test]
    fn test_decode_flat_map_rejects_non_json() {
        let err = decode_flat_map(b"-----------------").unwrap_err();
        assert!(matches!(err, MapDecodeError::Json(_)));
    }

    #[test]
    fn test_decode_flat_map_rejects_non_object() {
        assert!(decode_flat_map(b"[1,2]").is_err());
        assert!(decode_flat_map(b"\"text\"").is_err());
    }
}
