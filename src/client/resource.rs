//! Resource descriptions.
//!
//! An [`HttpResource<T>`] describes one HTTP call: where it goes, how it is
//! sent, and a pure function that turns the response bytes into a typed
//! [`Result<T>`]. Resources are built right before dispatch and never
//! mutated afterwards.
//!
//! # Examples
//!
//! ```
//! use chat_adapter_http::client::{json_resource, HttpMethod};
//! use chat_adapter_http::json::JsonObject;
//! use url::Url;
//!
//! let base = Url::parse("http://localhost:3001").unwrap();
//! let mut params = JsonObject::new();
//! params.insert("id".into(), 7.into());
//!
//! let resource = json_resource(&base, "items/get", HttpMethod::Get, &params, |json| {
//!     Ok(json.len())
//! });
//!
//! assert_eq!(resource.parse(br#"{"a": 1, "b": 2}"#).unwrap(), 2);
//! assert!(resource.parse(b"garbage").is_err());
//! ```

use crate::error::{HttpError, Result};
use crate::json::{dump_json, parse_json, JsonObject};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Content type attached to every JSON resource.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP method of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`, parameters travel in the query string
    Get,
    /// `POST`, body sent verbatim
    Post,
    /// `PUT`, body sent verbatim
    Put,
    /// `DELETE`, body sent verbatim
    Delete,
}

impl HttpMethod {
    /// Canonical upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the request body is flattened into the URL query instead of
    /// being sent as the payload.
    pub fn encodes_parameters_in_url(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Pure function from response bytes to a typed result.
pub type ParseFn<T> = Arc<dyn Fn(&[u8]) -> Result<T> + Send + Sync>;

/// Immutable description of a single HTTP call.
///
/// The `parse` function must be free of side effects and deterministic for
/// a given input; the client may call it on any thread.
pub struct HttpResource<T> {
    base_url: Url,
    path: String,
    method: HttpMethod,
    request_body: Option<Bytes>,
    headers: BTreeMap<String, String>,
    parse: ParseFn<T>,
}

impl<T> HttpResource<T> {
    /// Create a resource from its parts.
    pub fn new<F>(
        base_url: Url,
        path: impl Into<String>,
        method: HttpMethod,
        request_body: Option<Bytes>,
        headers: BTreeMap<String, String>,
        parse: F,
    ) -> Self
    where
        F: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
    {
        HttpResource {
            base_url,
            path: path.into(),
            method,
            request_body,
            headers,
            parse: Arc::new(parse),
        }
    }

    /// Absolute origin the path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Path relative to [`base_url`](Self::base_url).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Raw request body, encoded by whoever built the resource.
    pub fn request_body(&self) -> Option<&Bytes> {
        self.request_body.as_ref()
    }

    /// Headers in the case the author wrote them.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Run the parse function over a response body.
    pub fn parse(&self, data: &[u8]) -> Result<T> {
        (self.parse)(data)
    }

    /// Target address: the path's segments appended to the base address
    /// path. A query on the base address is kept, and a query written in the
    /// path is joined onto it with `&`.
    pub fn url(&self) -> Result<Url> {
        let (path, path_query) = match self.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.path.as_str(), None),
        };

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                HttpError::InvalidRequest(format!("{} cannot be a base URL", self.base_url))
            })?;
            let mut pieces = path.split('/').filter(|piece| !piece.is_empty()).peekable();
            if pieces.peek().is_some() {
                segments.pop_if_empty().extend(pieces);
            }
        }

        if let Some(path_query) = path_query.filter(|query| !query.is_empty()) {
            let combined = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{}&{}", existing, path_query),
                _ => path_query.to_string(),
            };
            url.set_query(Some(&combined));
        }

        Ok(url)
    }
}

impl<T: 'static> HttpResource<T> {
    /// Same resource, with `inspector` shown the raw body before it is
    /// parsed. The parse result is unchanged.
    pub fn inspect<F>(self, inspector: F) -> Self
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        let parse = Arc::clone(&self.parse);
        HttpResource {
            parse: Arc::new(move |data: &[u8]| {
                inspector(data);
                parse(data)
            }),
            ..self
        }
    }
}

impl<T> Clone for HttpResource<T> {
    fn clone(&self) -> Self {
        HttpResource {
            base_url: self.base_url.clone(),
            path: self.path.clone(),
            method: self.method,
            request_body: self.request_body.clone(),
            headers: self.headers.clone(),
            parse: Arc::clone(&self.parse),
        }
    }
}

impl<T> fmt::Display for HttpResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .request_body
            .as_deref()
            .and_then(|body| std::str::from_utf8(body).ok())
            .unwrap_or("");
        write!(
            f,
            "HTTPResource<Method: {}, path: {}, headers: {:?}, requestBody: {}>",
            self.method, self.path, self.headers, body
        )
    }
}

impl<T> fmt::Debug for HttpResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResource")
            .field("base_url", &self.base_url.as_str())
            .field("path", &self.path)
            .field("method", &self.method)
            .field("request_body", &self.request_body)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Build a resource that sends `parameters` as JSON and parses a JSON reply.
///
/// The parameters become the request body (or the query string for GET),
/// `Content-Type: application/json` is always set, and the response is
/// decoded with [`parse_json`] before `parse` sees it. Undecodable bodies
/// fail with [`HttpError::ParseDataFailed`].
pub fn json_resource<T, F>(
    base_url: &Url,
    path: &str,
    method: HttpMethod,
    parameters: &JsonObject,
    parse: F,
) -> HttpResource<T>
where
    F: Fn(&JsonObject) -> Result<T> + Send + Sync + 'static,
{
    let json_parse = move |data: &[u8]| match parse_json(data) {
        Some(json) => parse(&json),
        None => Err(HttpError::ParseDataFailed),
    };

    let body = dump_json(parameters).map(Bytes::from);
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());

    HttpResource::new(base_url.clone(), path, method, body, headers, json_parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("http://192.168.2.145:3001").unwrap()
    }

    #[test]
    fn test_url_joins_with_single_slash() {
        let resource = HttpResource::new(
            Url::parse("http://host:1/api/").unwrap(),
            "/account/login",
            HttpMethod::Get,
            None,
            BTreeMap::new(),
            |_| Ok(()),
        );
        assert_eq!(resource.url().unwrap().as_str(), "http://host:1/api/account/login");
    }

    #[test]
    fn test_url_keeps_base_query() {
        let resource = HttpResource::new(
            Url::parse("http://h:1/api?v=2").unwrap(),
            "account/login",
            HttpMethod::Post,
            None,
            BTreeMap::new(),
            |_| Ok(()),
        );
        let url = resource.url().unwrap();
        assert_eq!(url.path(), "/api/account/login");
        assert_eq!(url.query(), Some("v=2"));
    }

    #[test]
    fn test_url_keeps_base_fragment_and_merges_path_query() {
        let resource = HttpResource::new(
            Url::parse("http://h:1/api/?v=2#top").unwrap(),
            "search?lang=en",
            HttpMethod::Get,
            None,
            BTreeMap::new(),
            |_| Ok(()),
        );
        assert_eq!(resource.url().unwrap().as_str(), "http://h:1/api/search?v=2&lang=en#top");
    }

    #[test]
    fn test_url_rejects_non_hierarchical_base() {
        let resource = HttpResource::new(
            Url::parse("mailto:someone@example.com").unwrap(),
            "x",
            HttpMethod::Get,
            None,
            BTreeMap::new(),
            |_| Ok(()),
        );
        assert!(matches!(resource.url(), Err(HttpError::InvalidRequest(_))));
    }

    #[test]
    fn test_inspect_sees_body_and_keeps_parse() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let resource = json_resource(&base(), "x", HttpMethod::Get, &JsonObject::new(), |json| Ok(json.len()))
            .inspect(move |data| sink.lock().unwrap().extend_from_slice(data));

        assert_eq!(resource.parse(br#"{"a": 1}"#), Ok(1));
        assert_eq!(seen.lock().unwrap().as_slice(), br#"{"a": 1}"#);
    }

    #[test]
    fn test_url_empty_path() {
        let resource = HttpResource::new(base(), "", HttpMethod::Get, None, BTreeMap::new(), |_| Ok(()));
        assert_eq!(resource.url().unwrap().as_str(), "http://192.168.2.145:3001/");
    }

    #[test]
    fn test_json_resource_sets_body_and_header() {
        let mut params = JsonObject::new();
        params.insert("account".into(), json!("alice"));
        let resource = json_resource(&base(), "account/login", HttpMethod::Post, &params, |_| Ok(()));

        assert_eq!(resource.method(), HttpMethod::Post);
        assert_eq!(resource.path(), "account/login");
        assert_eq!(
            resource.headers().get("Content-Type").map(String::as_str),
            Some(JSON_CONTENT_TYPE)
        );
        let body = resource.request_body().unwrap();
        assert_eq!(parse_json(body), Some(params));
    }

    #[test]
    fn test_json_resource_parse_failure() {
        let resource = json_resource(&base(), "x", HttpMethod::Get, &JsonObject::new(), |_| Ok(1));
        assert_eq!(resource.parse(b"not json"), Err(HttpError::ParseDataFailed));
        assert_eq!(resource.parse(b"{}"), Ok(1));
    }

    #[test]
    fn test_display() {
        let mut params = JsonObject::new();
        params.insert("a".into(), json!(1));
        let resource = json_resource(&base(), "p", HttpMethod::Get, &params, |_| Ok(()));
        assert_eq!(
            resource.to_string(),
            r#"HTTPResource<Method: GET, path: p, headers: {"Content-Type": "application/json"}, requestBody: {"a":1}>"#
        );
    }

    #[test]
    fn test_method_encoding_rule() {
        assert!(HttpMethod::Get.encodes_parameters_in_url());
        assert!(!HttpMethod::Post.encodes_parameters_in_url());
        assert_eq!(reqwest::Method::from(HttpMethod::Delete), reqwest::Method::DELETE);
    }
}
