//! The network seam under [`HttpClient`](super::HttpClient).
//!
//! A [`Transport`] executes one request and reports what came back. The
//! default [`ReqwestTransport`] uses a single `reqwest::Client`, whose own
//! connection pool and runtime workers carry the concurrency; nothing here
//! queues, retries or rate-limits.
//!
//! [`classify`] maps the raw outcome onto the error model, first match wins:
//!
//! | Outcome | Result |
//! |---------|--------|
//! | transport error | `Err(Transport)` |
//! | no response | `Err(NoResponse)` |
//! | empty or absent body | `Err(NoData)` |
//! | otherwise | `Ok(body)` |

use super::config::{ClientConfig, TrustPolicy};
use crate::error::{HttpError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Request, StatusCode};
use std::time::Duration;

/// What the server sent back.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes, `None` when the transport had none to give
    pub body: Option<Bytes>,
}

/// Executes a built request.
///
/// `Ok(None)` means the exchange finished without a response object.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the complete response.
    async fn execute(&self, request: Request) -> Result<Option<RawResponse>>;
}

/// Reduce a transport outcome to the body bytes to parse.
pub fn classify(outcome: Result<Option<RawResponse>>) -> Result<Bytes> {
    let response = outcome?.ok_or(HttpError::NoResponse)?;
    match response.body {
        Some(body) if !body.is_empty() => Ok(body),
        _ => Err(HttpError::NoData),
    }
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying client according to `config`.
    ///
    /// # Errors
    ///
    /// [`HttpError::Config`] for an unusable proxy URL, a root certificate
    /// that is not valid PEM, or a TLS backend failure.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        if !config.proxy_url.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy_url)
                .map_err(|e| HttpError::Config(format!("proxy {}: {}", config.proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        match &config.trust_policy {
            TrustPolicy::SystemRoots => {}
            TrustPolicy::AdditionalRoots(roots) => {
                for pem in roots {
                    let certificate = reqwest::Certificate::from_pem(pem)
                        .map_err(|e| HttpError::Config(format!("root certificate: {}", e)))?;
                    builder = builder.add_root_certificate(certificate);
                }
            }
            TrustPolicy::DangerAcceptInvalidCertificates => {
                tracing::warn!("certificate validation disabled; development use only");
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let client = builder
            .build()
            .map_err(|e| HttpError::Config(e.to_string()))?;

        Ok(ReqwestTransport { client })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Option<RawResponse>> {
        let response = self.client.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Some(RawResponse {
            status,
            headers,
            body: Some(body),
        }))
    }
}
