//! Correlation-ID extraction from structured response bodies.
//!
//! # Responsibilities
//! - Parse a captured response body as a JSON object
//! - Walk a field path through nested objects to a string leaf
//! - Try the known correlation-ID locations in priority order
//!
//! # Design Decisions
//! - Traversal is an explicit loop, not recursion, and paths are capped at
//!   [`MAX_PATH_DEPTH`] segments
//! - "Not found" is a normal outcome (`None`); only parsing can fail
//! - Parse failures are reported to the caller as [`DocumentError`] so they
//!   can be logged, never propagated out of finalize

use serde_json::{Map, Value};
use thiserror::Error;

/// Longest field path the extractor will follow.
pub const MAX_PATH_DEPTH: usize = 32;

/// Where correlation IDs live in response bodies, highest priority first.
pub const REQUEST_ID_PATHS: &[&[&str]] = &[&["data", "Response", "RequestId"], &["Response", "RequestId"]];

/// Reasons a body could not be parsed into a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("body is empty")]
    Empty,

    #[error("body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("body is not a JSON object")]
    NotAnObject,
}

/// Parse a body into a top-level object.
pub fn parse_document(body: &str) -> Result<Map<String, Value>, DocumentError> {
    if body.is_empty() {
        return Err(DocumentError::Empty);
    }
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(DocumentError::NotAnObject),
    }
}

/// Follow `path` from `doc` and return the string at its end.
///
/// Every intermediate node must be an object and the terminal node a
/// string; anything else, an empty path, or a path deeper than
/// [`MAX_PATH_DEPTH`] yields `None`.
pub fn find_nested_value<'a, S: AsRef<str>>(doc: &'a Map<String, Value>, path: &[S]) -> Option<&'a str> {
    find_nested(doc, path)?.as_str()
}

/// Walk `path` and return whatever value sits at its end, of any type.
pub fn find_nested<'a, S: AsRef<str>>(doc: &'a Map<String, Value>, path: &[S]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    if path.len() > MAX_PATH_DEPTH {
        return None;
    }
    let mut current = doc;
    for segment in parents {
        current = current.get(segment.as_ref())?.as_object()?;
    }
    current.get(last.as_ref())
}

/// First non-empty correlation ID found along [`REQUEST_ID_PATHS`].
pub fn request_id_from_document(doc: &Map<String, Value>) -> Option<&str> {
    REQUEST_ID_PATHS
        .iter()
        .filter_map(|path| find_nested_value(doc, *path))
        .find(|id| !id.is_empty())
}

/// Parse `body` and extract its correlation ID.
///
/// `Ok(None)` means the body parsed but carries no ID.
pub fn extract_request_id(body: &str) -> Result<Option<String>, DocumentError> {
    let doc = parse_document(body)?;
    Ok(request_id_from_document(&doc).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_find_nested_value() {
        let d = doc(json!({
            "a": { "b": { "c": "leaf", "n": 1 } },
            "s": "top",
            "arr": [{ "x": "y" }]
        }));

        assert_eq!(find_nested_value(&d, &["a", "b", "c"]), Some("leaf"));
        assert_eq!(find_nested_value(&d, &["s"]), Some("top"));
        // Terminal node is not a string.
        assert_eq!(find_nested_value(&d, &["a", "b", "n"]), None);
        assert_eq!(find_nested_value(&d, &["a", "b"]), None);
        // Intermediate node is not an object.
        assert_eq!(find_nested_value(&d, &["s", "x"]), None);
        assert_eq!(find_nested_value(&d, &["arr", "x"]), None);
        // Missing keys and empty paths.
        assert_eq!(find_nested_value(&d, &["a", "missing", "c"]), None);
        assert_eq!(find_nested_value::<&str>(&d, &[]), None);
    }

    #[test]
    fn test_depth_cap() {
        let path: Vec<String> = (0..=MAX_PATH_DEPTH).map(|i| format!("k{}", i)).collect();
        let mut value = json!("deep");
        for key in path.iter().rev() {
            let mut map = Map::new();
            map.insert(key.clone(), value);
            value = Value::Object(map);
        }
        let d = doc(value);
        assert_eq!(find_nested_value(&d, &path[..]), None);
        assert!(find_nested_value(&d, &path[..MAX_PATH_DEPTH]).is_none());
        assert!(find_nested(&d, &path[..MAX_PATH_DEPTH]).is_some());
    }

    #[test]
    fn test_request_id_priority() {
        let both = json!({
            "data": { "Response": { "RequestId": "first" } },
            "Response": { "RequestId": "second" }
        });
        assert_eq!(extract_request_id(&both.to_string()).unwrap().as_deref(), Some("first"));

        let nested_only = r#"{"data":{"Response":{"RequestId":"xyz"}}}"#;
        assert_eq!(extract_request_id(nested_only).unwrap().as_deref(), Some("xyz"));

        let top_only = r#"{"Response":{"RequestId":"abc-123"}}"#;
        assert_eq!(extract_request_id(top_only).unwrap().as_deref(), Some("abc-123"));

        // An empty first hit falls through to the next path.
        let empty_first = r#"{"data":{"Response":{"RequestId":""}},"Response":{"RequestId":"r2"}}"#;
        assert_eq!(extract_request_id(empty_first).unwrap().as_deref(), Some("r2"));

        let none = r#"{"data":{"Response":{"RequestId":7}}}"#;
        assert_eq!(extract_request_id(none).unwrap(), None);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(extract_request_id(""), Err(DocumentError::Empty)));
        assert!(matches!(extract_request_id("{not json"), Err(DocumentError::Malformed(_))));
        assert!(matches!(extract_request_id("[1, 2]"), Err(DocumentError::NotAnObject)));
    }
}
