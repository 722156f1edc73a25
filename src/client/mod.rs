//! Generic HTTP resource client.
//!
//! This module turns immutable resource descriptions into network calls and
//! typed results:
//!
//! - **Describe** a call with [`HttpResource<T>`] (or [`json_resource`])
//! - **Build** the concrete request with [`build_request`]
//! - **Execute** it through a [`Transport`] with [`HttpClient`]
//! - **Deliver** the [`Result<T>`](crate::Result) on a chosen [`Dispatcher`]
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── resource  - HttpMethod, HttpResource and the JSON resource helper
//! ├── query     - Query string flattening and escaping
//! ├── request   - Request construction and cURL rendering
//! ├── transport - Transport trait, reqwest transport, outcome classification
//! ├── config    - Client configuration and certificate trust policy
//! ├── dispatch  - Completion contexts (inline, main queue, runtime)
//! ├── task      - Cancellable request handles
//! └── fetch     - HttpClient
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HttpResource`] | Description of one call plus its parse function |
//! | [`HttpClient`] | Executes resources |
//! | [`ClientConfig`] | Transport settings |
//! | [`TrustPolicy`] | Certificate validation policy |
//! | [`MainQueue`] | Main-loop context for completions |
//! | [`RequestTask`] | Cancellable handle to an in-flight call |
//!
//! # Examples
//!
//! ## Building a Request
//!
//! ```
//! use chat_adapter_http::client::{build_request, json_resource, HttpMethod};
//! use chat_adapter_http::json::JsonObject;
//! use url::Url;
//!
//! let base = Url::parse("http://localhost:3001").unwrap();
//! let mut params = JsonObject::new();
//! params.insert("page".into(), 2.into());
//!
//! let resource = json_resource(&base, "messages", HttpMethod::Get, &params, |_| Ok(()));
//! let request = build_request(&resource).unwrap();
//! assert_eq!(request.url().as_str(), "http://localhost:3001/messages?page=2");
//! assert!(request.body().is_none());
//! ```

mod config;
mod dispatch;
mod fetch;
mod query;
mod request;
mod resource;
mod task;
mod transport;

pub use config::{ClientConfig, TrustPolicy};
pub use dispatch::{Dispatcher, Inline, Job, MainQueue, MainQueueHandle};
pub use fetch::{HttpClient, ModifyRequest};
pub use query::{escape, query, query_components};
pub use request::{build_request, curl_command_line};
pub use resource::{json_resource, HttpMethod, HttpResource, ParseFn, JSON_CONTENT_TYPE};
pub use task::{Completion, RequestTask};
pub use transport::{classify, RawResponse, ReqwestTransport, Transport};
