//! Turning a resource into a concrete request.
//!
//! # Construction
//!
//! 1. Base address and path are joined into the target URL.
//! 2. The method is set.
//! 3. For methods that carry parameters in the URL (GET), the JSON body is
//!    flattened with [`query`](super::query) and appended to any query the
//!    URL already has; no payload is sent.
//! 4. Otherwise the body is attached verbatim.
//! 5. Resource headers are applied.
//!
//! The caller hook of [`HttpClient`](super::HttpClient) runs after these
//! steps.

use super::query::query;
use super::resource::HttpResource;
use crate::error::{HttpError, Result};
use crate::json::parse_json;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Request;

/// Build the request described by `resource`.
///
/// # Errors
///
/// [`HttpError::InvalidRequest`] when the joined URL does not parse, a
/// header name or value is not valid HTTP, or a GET body is not a JSON
/// object.
pub fn build_request<T>(resource: &HttpResource<T>) -> Result<Request> {
    let mut url = resource.url()?;
    let mut payload = None;

    if resource.method().encodes_parameters_in_url() {
        if let Some(body) = resource.request_body() {
            let parameters = parse_json(body).ok_or_else(|| {
                HttpError::InvalidRequest(format!(
                    "{} body must be a JSON object to be encoded in the URL",
                    resource.method()
                ))
            })?;
            let encoded = query(&parameters);
            if !encoded.is_empty() {
                let combined = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
                    _ => encoded,
                };
                url.set_query(Some(&combined));
            }
        }
    } else {
        payload = resource.request_body().cloned();
    }

    let mut request = Request::new(resource.method().into(), url);
    if let Some(payload) = payload {
        *request.body_mut() = Some(payload.into());
    }

    for (name, value) in resource.headers() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HttpError::InvalidRequest(format!("header name {:?}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| HttpError::InvalidRequest(format!("header {:?} value: {}", name, e)))?;
        request.headers_mut().insert(header_name, header_value);
    }

    Ok(request)
}

/// Render a request as an equivalent `curl` invocation, for logs.
pub fn curl_command_line(request: &Request) -> String {
    let mut parts = vec!["curl -i".to_string()];

    if request.method() != reqwest::Method::GET {
        parts.push(format!("-X {}", request.method()));
    }

    for (name, value) in request.headers() {
        let value = String::from_utf8_lossy(value.as_bytes());
        parts.push(format!("-H {}", shell_quote(&format!("{}: {}", name, value))));
    }

    if let Some(body) = request.body().and_then(|body| body.as_bytes()) {
        parts.push(format!("-d {}", shell_quote(&String::from_utf8_lossy(body))));
    }

    parts.push(shell_quote(request.url().as_str()));
    parts.join(" \\\n\t")
}

/// Single-quote `value` for a POSIX shell. Nothing inside single quotes is
/// expanded; an embedded `'` becomes `'\''`.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
