//! Query string flattening for parameters sent in the URL.
//!
//! Nested objects and arrays use the bracket convention understood by most
//! web frameworks:
//!
//! | Value | Pairs |
//! |-------|-------|
//! | `{"a": 1}` | `a=1` |
//! | `{"a": {"b": 1}}` | `a[b]=1` |
//! | `{"c": [2, 3]}` | `c[]=2`, `c[]=3` |
//!
//! Top-level keys are emitted in ascending order so the same parameters
//! always produce the same query string.

use crate::json::JsonObject;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Characters left as-is in keys and values: RFC 3986 unreserved plus the
/// brackets used for nesting. Everything else, including
/// `:/?&=;+!@#$()',*`, is percent-encoded.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'[')
    .remove(b']');

/// Percent-encode one key or value.
pub fn escape(string: &str) -> String {
    utf8_percent_encode(string, QUERY_ESCAPE).to_string()
}

/// Flatten one parameter into escaped `(key, value)` pairs.
///
/// ```
/// use chat_adapter_http::client::query_components;
/// use serde_json::json;
///
/// let pairs = query_components("user", &json!({"tags": ["a b", "c"]}));
/// assert_eq!(pairs, vec![
///     ("user[tags][]".to_string(), "a%20b".to_string()),
///     ("user[tags][]".to_string(), "c".to_string()),
/// ]);
/// ```
pub fn query_components(key: &str, value: &Value) -> Vec<(String, String)> {
    let mut components = Vec::new();
    collect_components(key, value, &mut components);
    components
}

fn collect_components(key: &str, value: &Value, components: &mut Vec<(String, String)>) {
    match value {
        Value::Object(object) => {
            for (nested_key, value) in object {
                collect_components(&format!("{}[{}]", key, nested_key), value, components);
            }
        }
        Value::Array(array) => {
            let array_key = format!("{}[]", key);
            for value in array {
                collect_components(&array_key, value, components);
            }
        }
        scalar => components.push((escape(key), escape(&stringify(scalar)))),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build a full query string from a parameter object.
///
/// ```
/// use chat_adapter_http::client::query;
/// use serde_json::json;
///
/// let params = json!({"c": [2, 3], "a": {"b": 1}});
/// let query = query(params.as_object().unwrap());
/// assert_eq!(query, "a[b]=1&c[]=2&c[]=3");
/// ```
pub fn query(parameters: &JsonObject) -> String {
    let mut keys: Vec<&String> = parameters.keys().collect();
    keys.sort();

    let mut components = Vec::new();
    for key in keys {
        collect_components(key, &parameters[key.as_str()], &mut components);
    }

    components
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}
