//! JSON codec for request bodies and response envelopes.
//!
//! Responses are always handed to parse functions as a [`JsonObject`]. When
//! the server answers with a top-level array it is wrapped as
//! `{"data": [...]}`, so callers never see an array at the top level.
//!
//! ```
//! use chat_adapter_http::json::{dump_json, parse_json};
//! use serde_json::json;
//!
//! let object = parse_json(br#"[1, 2]"#).unwrap();
//! assert_eq!(object["data"], json!([1, 2]));
//!
//! let bytes = dump_json(&object).unwrap();
//! assert_eq!(parse_json(&bytes), Some(object));
//! ```

use serde_json::{Map, Value};

/// A string-keyed JSON mapping.
pub type JsonObject = Map<String, Value>;

/// Key under which a top-level array is placed by [`parse_json`].
pub const ARRAY_KEY: &str = "data";

/// Decode bytes into a JSON object.
///
/// Returns `None` for malformed input and for top-level scalars.
pub fn parse_json(data: &[u8]) -> Option<JsonObject> {
    match serde_json::from_slice::<Value>(data).ok()? {
        Value::Object(object) => Some(object),
        Value::Array(array) => {
            let mut object = JsonObject::new();
            object.insert(ARRAY_KEY.to_string(), Value::Array(array));
            Some(object)
        }
        _ => None,
    }
}

/// Encode a JSON object into bytes.
///
/// `serde_json` numbers cannot hold NaN or infinities, so a [`JsonObject`]
/// is always representable; `None` is kept for serializer failures.
pub fn dump_json(object: &JsonObject) -> Option<Vec<u8>> {
    serde_json::to_vec(object).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(object) => object,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_parse_object() {
        let parsed = parse_json(br#"{"code": 0, "data": {"a": "b"}}"#).unwrap();
        assert_eq!(parsed["code"], json!(0));
        assert_eq!(parsed["data"]["a"], json!("b"));
    }

    #[test]
    fn test_parse_array_is_wrapped() {
        let parsed = parse_json(br#"[{"a": 1}, {"b": 2}]"#).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[ARRAY_KEY], json!([{"a": 1}, {"b": 2}]));
    }

    #[test]
    fn test_parse_scalar_array_is_wrapped() {
        let parsed = parse_json(b"[1, \"two\", null]").unwrap();
        assert_eq!(parsed["data"], json!([1, "two", null]));
    }

    #[test]
    fn test_parse_rejects_scalars() {
        assert_eq!(parse_json(b"42"), None);
        assert_eq!(parse_json(b"\"text\""), None);
        assert_eq!(parse_json(b"null"), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_json(b"{\"code\":"), None);
        assert_eq!(parse_json(b""), None);
        assert_eq!(parse_json(&[0xff, 0xfe]), None);
    }

    #[test]
    fn test_round_trip() {
        let original = object(json!({
            "account": "alice",
            "nested": {"list": [1, 2.5, true, null], "empty": {}},
            "unicode": "caf\u{e9}"
        }));
        let bytes = dump_json(&original).unwrap();
        assert_eq!(parse_json(&bytes), Some(original));
    }
}
