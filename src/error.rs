//! Error types and result handling.
//!
//! Every operation in this crate that can fail reports through [`Result`],
//! a two-case outcome: the success value, or exactly one [`HttpError`].
//! Nothing is retried or swallowed; the caller always sees the failure.
//!
//! # Error Kinds
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`HttpError::Transport`] | The connection failed or the body could not be read |
//! | [`HttpError::NoResponse`] | The transport finished without a response object |
//! | [`HttpError::NoData`] | A response arrived with an empty or absent body |
//! | [`HttpError::ParseDataFailed`] | The body was not the expected JSON shape |
//! | [`HttpError::Api`] | The server envelope reported a nonzero `code` |
//! | [`HttpError::InvalidRequest`] | The resource could not be turned into a request |
//! | [`HttpError::Config`] | The client could not be constructed |

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, HttpError>;

/// Failures surfaced by the HTTP pipeline and the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Network or connection failure, carrying the underlying cause.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The transport completed without a structured response.
    #[error("No response")]
    NoResponse,

    /// A response was received but its body was empty or absent.
    #[error("No data")]
    NoData,

    /// The body was malformed or lacked an expected field.
    #[error("Parse data failed")]
    ParseDataFailed,

    /// The server answered with a nonzero status code in its envelope.
    #[error("API error {code}: {reason}")]
    Api {
        /// Application status code taken from the envelope.
        code: i64,
        /// Human readable reason, empty when the code is not a known one.
        reason: String,
    },

    /// The resource could not be converted into a concrete request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client configuration was rejected.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl HttpError {
    /// Application status code, if this is an [`HttpError::Api`] failure.
    pub fn code(&self) -> Option<i64> {
        match self {
            HttpError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the failure happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, HttpError::Transport(_))
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        HttpError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        HttpError::InvalidRequest(err.to_string())
    }
}
