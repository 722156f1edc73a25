//! Client configuration.
//!
//! ```
//! use chat_adapter_http::client::{ClientConfig, TrustPolicy};
//!
//! let config = ClientConfig {
//!     request_timeout_ms: Some(5_000),
//!     ..Default::default()
//! };
//! assert_eq!(config.trust_policy, TrustPolicy::SystemRoots);
//! ```

/// How server certificates are validated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrustPolicy {
    /// Validate against the platform's trusted roots.
    #[default]
    SystemRoots,
    /// Validate against the platform roots plus these PEM-encoded roots.
    ///
    /// Use this for LAN servers with a private CA instead of disabling
    /// validation.
    AdditionalRoots(Vec<Vec<u8>>),
    /// Accept any certificate, including self-signed and expired ones.
    ///
    /// **Development only.** Anyone on the network path can impersonate the
    /// server. A warning is logged every time a client is built with it.
    DangerAcceptInvalidCertificates,
}

/// Settings for the transport behind an [`HttpClient`](super::HttpClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout in milliseconds; `None` keeps the transport
    /// default
    pub request_timeout_ms: Option<u64>,
    /// Proxy for all schemes; empty for a direct connection
    pub proxy_url: String,
    /// `User-Agent` header sent with every request
    pub user_agent: Option<String>,
    /// Certificate validation policy
    pub trust_policy: TrustPolicy,
    /// Emit `tracing` events for requests and outcomes
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: None,
            proxy_url: String::new(),
            user_agent: None,
            trust_policy: TrustPolicy::SystemRoots,
            enable_logging: true,
        }
    }
}

impl ClientConfig {
    /// Configuration for talking to a development server with a self-signed
    /// certificate. Never use this against a real deployment.
    pub fn insecure_development() -> Self {
        ClientConfig {
            trust_policy: TrustPolicy::DangerAcceptInvalidCertificates,
            ..Default::default()
        }
    }
}
