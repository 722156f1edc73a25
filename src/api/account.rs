//! Account endpoints.
//!
//! `GET account/login?account=..&passwd=..&type=..` exchanges credentials for
//! a session token and the address of the realtime chat server:
//!
//! ```json
//! {
//!   "code": 0,
//!   "data": {
//!     "access_token": "T",
//!     "userinfo": {"uid": "U"},
//!     "server": {"host": "H", "port": 3001}
//!   }
//! }
//! ```

use super::{parse_envelope, ChatAdapterApi};
use crate::client::{json_resource, HttpMethod, HttpResource};
use crate::error::{HttpError, Result};
use crate::json::JsonObject;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Login type sent by the mobile client.
pub const DEFAULT_LOGIN_TYPE: &str = "tel";

/// Connector route that enters the chat after connecting.
pub const ENTRY_ROUTE: &str = "connector.entryHandler.enter";

const LOGIN_PATH: &str = "account/login";

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User identifier
    #[serde(rename = "uid")]
    pub user_id: String,
}

/// Realtime chat server to connect to after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Host name or address
    pub host: String,
    /// TCP port
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
}

/// Any JSON number holding a whole value in `0..=65535`, so `3001.0` is
/// accepted like `3001`.
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u16::MAX))
                .map(|f| f as u64)
        })
        .and_then(|port| u16::try_from(port).ok())
        .ok_or_else(|| D::Error::custom(format!("invalid port {}", number)))
}

/// Everything a successful login returns.
///
/// Only ever built from a fully valid response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    /// Opaque session credential
    #[serde(rename = "access_token")]
    pub token: String,
    /// The user the token belongs to
    #[serde(rename = "userinfo")]
    pub user_info: UserInfo,
    /// Where to connect next
    pub server: Server,
}

impl LoginInfo {
    /// `host:port` of the chat server.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Parameters for [`ENTRY_ROUTE`] once connected to the chat server.
    pub fn entry_params(&self) -> JsonObject {
        let mut params = JsonObject::new();
        params.insert("uid".into(), Value::String(self.user_info.user_id.clone()));
        params.insert("access_token".into(), Value::String(self.token.clone()));
        params
    }
}

/// Parse a login response.
///
/// Requires a successful envelope and `data.access_token`,
/// `data.userinfo.uid`, `data.server.host` (strings) and `data.server.port`
/// (a number in `0..=65535`). Anything else is
/// [`HttpError::ParseDataFailed`].
pub fn parse_login(json: &JsonObject) -> Result<LoginInfo> {
    let envelope = parse_envelope(json)?;
    let data = envelope.get("data").ok_or(HttpError::ParseDataFailed)?;
    LoginInfo::deserialize(data).map_err(|_| HttpError::ParseDataFailed)
}

/// The login resource for `account` / `password`.
///
/// ```
/// use chat_adapter_http::api::{login_resource, ChatAdapterApi, DEFAULT_LOGIN_TYPE};
/// use chat_adapter_http::client::build_request;
///
/// let api = ChatAdapterApi::from_address("localhost:3001").unwrap();
/// let resource = login_resource(&api, "alice", "secret", DEFAULT_LOGIN_TYPE);
/// let request = build_request(&resource).unwrap();
/// assert_eq!(
///     request.url().as_str(),
///     "http://localhost:3001/account/login?account=alice&passwd=secret&type=tel"
/// );
/// ```
pub fn login_resource(
    api: &ChatAdapterApi,
    account: &str,
    password: &str,
    login_type: &str,
) -> HttpResource<LoginInfo> {
    let mut params = JsonObject::new();
    params.insert("account".into(), Value::String(account.to_string()));
    params.insert("passwd".into(), Value::String(password.to_string()));
    params.insert("type".into(), Value::String(login_type.to_string()));

    json_resource(api.base_url(), LOGIN_PATH, HttpMethod::Get, &params, parse_login)
}
