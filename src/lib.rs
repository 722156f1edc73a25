#![warn(missing_docs)]

//! # Chat Adapter HTTP
//!
//! A small typed HTTP layer and the chat adapter API built on it. A login
//! call exchanges account credentials for a session token and the address of
//! the realtime chat server; the application then hands those to its
//! realtime connector.
//!
//! ## Overview
//!
//! The crate is built from four pieces, leaf first:
//!
//! 1. **Result** - every fallible operation returns [`Result<T>`] with an
//!    [`HttpError`] describing exactly one failure
//! 2. **JSON codec** - [`json::parse_json`] / [`json::dump_json`] over
//!    string-keyed objects
//! 3. **Resources and client** - an [`HttpResource<T>`] describes one call and
//!    how to parse its reply; [`HttpClient`] executes it
//! 4. **Chat adapter API** - the login resource, envelope validation, and
//!    the [`ChatAdapter`] wrapper
//!
//! Data flows as: build `HttpResource<LoginInfo>` → `HttpClient` sends it →
//! raw bytes → JSON decode → envelope check → `LoginInfo` → completion on the
//! caller's context.
//!
//! ## Usage
//!
//! ```ignore
//! use chat_adapter_http::api::{ChatAdapter, ChatAdapterApi};
//! use chat_adapter_http::client::{HttpClient, Inline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ChatAdapterApi::from_address("127.0.0.1:3001")?;
//!     let adapter = ChatAdapter::new(api, HttpClient::new(), Arc::new(Inline));
//!
//!     let info = adapter.fetch_login("alice", "secret").await?;
//!     println!("chat server at {}", info.server_address());
//!     println!("entry params: {:?}", info.entry_params());
//!     Ok(())
//! }
//! ```
//!
//! ## Certificate Validation
//!
//! Certificates are validated by default. Development servers with a
//! self-signed certificate can be reached with
//! [`TrustPolicy::AdditionalRoots`], or, for throwaway setups only,
//! [`TrustPolicy::DangerAcceptInvalidCertificates`].
//!
//! ## Module Structure
//!
//! - **[error]** - Error types and result handling
//! - **[json]** - JSON codec
//! - **[client]** - Resources, request construction, transport, dispatch
//! - **[api]** - Chat adapter endpoints

pub mod api;
pub mod client;
pub mod error;
pub mod json;

pub use api::{ChatAdapter, ChatAdapterApi, LoginInfo};
pub use client::{ClientConfig, HttpClient, HttpMethod, HttpResource, TrustPolicy};
pub use error::{HttpError, Result};
