//! Chat adapter REST API.
//!
//! Every response of the chat adapter service is wrapped in an envelope:
//!
//! ```json
//! {"code": 0, "data": { ... }}
//! ```
//!
//! `code == 0` means success; any other value is an application error
//! identified by that code. [`parse_envelope`] enforces this for every
//! resource defined here, and [`void_parse`] serves endpoints that carry
//! nothing beyond the envelope.
//!
//! # Module Organization
//!
//! ```text
//! api/
//! ├── account - login resource and LoginInfo
//! └── adapter - ChatAdapter request wrapper and ApiObserver
//! ```

mod account;
mod adapter;

pub use account::{login_resource, parse_login, LoginInfo, Server, UserInfo, DEFAULT_LOGIN_TYPE, ENTRY_ROUTE};
pub use adapter::{ApiObserver, ChatAdapter, TracingObserver};

use crate::error::{HttpError, Result};
use crate::json::JsonObject;
use serde_json::Value;
use url::Url;

/// Address of the chat adapter on the development LAN.
pub const DEFAULT_ADDRESS: &str = "192.168.2.145:3001";

/// Application error codes defined by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request parameters were rejected before sending.
    ParametersError = -9001,
}

impl ErrorCode {
    /// Numeric code.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Look up a known code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -9001 => Some(ErrorCode::ParametersError),
            _ => None,
        }
    }

    /// Failure reason for this code.
    pub fn reason(self) -> &'static str {
        match self {
            ErrorCode::ParametersError => "Parameters error",
        }
    }
}

/// Build an application error for `code`.
///
/// Known codes get their reason from [`ErrorCode`]; the service sends no
/// reason text of its own, so other codes carry an empty reason.
pub fn error_with_code(code: i64) -> HttpError {
    let reason = ErrorCode::from_code(code)
        .map(|known| known.reason().to_string())
        .unwrap_or_default();
    HttpError::Api { code, reason }
}

/// Location of the chat adapter service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAdapterApi {
    base_url: Url,
}

impl ChatAdapterApi {
    /// API rooted at `base_url`.
    pub fn new(base_url: Url) -> Self {
        ChatAdapterApi { base_url }
    }

    /// API at `http://{address}`.
    pub fn from_address(address: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(&format!("http://{}", address))?))
    }

    /// API at [`DEFAULT_ADDRESS`].
    pub fn development() -> Result<Self> {
        Self::from_address(DEFAULT_ADDRESS)
    }

    /// Base URL all resources are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Validate the response envelope.
///
/// Returns the whole envelope, `code` included, when `code` is `0`.
///
/// # Errors
///
/// - [`HttpError::ParseDataFailed`] if `code` is missing or not a number
/// - [`HttpError::Api`] carrying the code if it is nonzero
pub fn parse_envelope(json: &JsonObject) -> Result<JsonObject> {
    let code = match json.get("code") {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .ok_or(HttpError::ParseDataFailed)?,
        _ => return Err(HttpError::ParseDataFailed),
    };

    if code != 0 {
        return Err(error_with_code(code));
    }

    Ok(json.clone())
}

/// Parse for endpoints whose only payload is the envelope status.
pub fn void_parse(json: &JsonObject) -> Result<()> {
    parse_envelope(json).map(|_| ())
}
