//! The generic HTTP client.
//!
//! [`HttpClient`] turns an [`HttpResource<T>`] into a network call and a
//! typed [`Result<T>`]. It is built once by the application and cloned
//! wherever it is needed; clones share the same transport.
//!
//! # Examples
//!
//! ## Awaiting a result
//!
//! ```ignore
//! use chat_adapter_http::client::HttpClient;
//!
//! let client = HttpClient::new();
//! let value = client.fetch(&resource, None).await?;
//! ```
//!
//! ## Completion on a main loop
//!
//! ```ignore
//! use chat_adapter_http::client::{Completion, HttpClient, MainQueue};
//! use std::sync::Arc;
//!
//! let client = HttpClient::new();
//! let (mut queue, main) = MainQueue::new();
//!
//! let task = client.request_resource(
//!     resource,
//!     Some(Box::new(|request| {
//!         request.headers_mut().insert("Authorization", "Bearer t".parse().unwrap());
//!     })),
//!     Some(Completion::on(Arc::new(main), |result| println!("{:?}", result))),
//! );
//!
//! queue.run_next().await;
//! ```

use super::config::ClientConfig;
use super::request::build_request;
use super::resource::HttpResource;
use super::task::{Completion, RequestTask, TaskState};
use super::transport::{classify, ReqwestTransport, Transport};
use crate::error::Result;
use reqwest::Request;
use std::sync::Arc;

/// Caller hook applied to the fully built request right before it is sent.
///
/// Meant for things like injecting auth headers. Rewriting the URL authority
/// is not supported.
pub type ModifyRequest = Box<dyn FnOnce(&mut Request) + Send + 'static>;

/// Executes [`HttpResource`]s.
///
/// There is no queueing, deduplication or retry: every call is one
/// independent request on the shared transport.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
}

impl HttpClient {
    /// Create a client with default configuration.
    pub fn new() -> Self {
        let config = ClientConfig::default();
        let transport = ReqwestTransport::from_config(&config)
            .unwrap_or_else(|_| ReqwestTransport::with_client(reqwest::Client::default()));
        Self::with_transport(Arc::new(transport), config)
    }

    /// Create a client backed by `reqwest` with custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create a client over any [`Transport`].
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        HttpClient {
            transport,
            config: Arc::new(config),
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute `resource` and parse its response.
    ///
    /// The parse function only runs when a non-empty body arrived; transport
    /// failures, missing responses and empty bodies are reported without
    /// calling it.
    pub async fn fetch<T>(
        &self,
        resource: &HttpResource<T>,
        modify_request: Option<ModifyRequest>,
    ) -> Result<T> {
        let mut request = build_request(resource)?;

        if let Some(modify) = modify_request {
            modify(&mut request);
        }

        if self.config.enable_logging {
            tracing::debug!("{} {}", request.method(), request.url());
        }

        let outcome = self.transport.execute(request).await;

        if self.config.enable_logging {
            match &outcome {
                Ok(Some(response)) => tracing::debug!(
                    "{} {} -> {}",
                    resource.method(),
                    resource.path(),
                    response.status
                ),
                Ok(None) => tracing::warn!("{} {}: no response", resource.method(), resource.path()),
                Err(e) => tracing::warn!("{} {} failed: {}", resource.method(), resource.path(), e),
            }
        }

        let data = classify(outcome)?;
        resource.parse(&data)
    }

    /// Start `resource` in the background and return a handle to it.
    ///
    /// `completion`, if given, receives the result exactly once on its
    /// dispatcher, unless the returned task is cancelled first.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn request_resource<T>(
        &self,
        resource: HttpResource<T>,
        modify_request: Option<ModifyRequest>,
        completion: Option<Completion<T>>,
    ) -> RequestTask
    where
        T: Send + 'static,
    {
        let state = Arc::new(TaskState::default());
        let task_state = Arc::clone(&state);
        let client = self.clone();

        let handle = tokio::spawn(async move {
            let result = client.fetch(&resource, modify_request).await;
            match completion {
                Some(completion) => completion.deliver(result, task_state),
                None => {
                    task_state.begin_completion();
                }
            }
        });

        RequestTask::new(state, handle)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::dispatch::MainQueue;
    use crate::client::resource::{json_resource, HttpMethod};
    use crate::client::transport::RawResponse;
    use crate::error::HttpError;
    use crate::json::JsonObject;
    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use url::Url;

    /// Transport that replays a canned outcome and records what it was sent.
    struct FakeTransport {
        outcome: Result<Option<RawResponse>>,
        sent: Mutex<Vec<Request>>,
    }

    impl FakeTransport {
        fn new(outcome: Result<Option<RawResponse>>) -> Arc<Self> {
            Arc::new(FakeTransport {
                outcome,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn body(body: &'static [u8]) -> Arc<Self> {
            Self::new(Ok(Some(RawResponse {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: Some(Bytes::from_static(body)),
            })))
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn execute(&self, request: Request) -> Result<Option<RawResponse>> {
            self.sent.lock().unwrap().push(request);
            self.outcome.clone()
        }
    }

    /// Transport that never answers.
    struct Stalled;

    #[async_trait]
    impl Transport for Stalled {
        async fn execute(&self, _request: Request) -> Result<Option<RawResponse>> {
            std::future::pending().await
        }
    }

    fn resource(parsed: Arc<AtomicBool>) -> HttpResource<usize> {
        let base = Url::parse("http://localhost:3001").unwrap();
        let mut params = JsonObject::new();
        params.insert("k".into(), "v".into());
        json_resource(&base, "things", HttpMethod::Get, &params, move |json| {
            parsed.store(true, Ordering::SeqCst);
            Ok(json.len())
        })
    }

    fn client(transport: Arc<dyn Transport>) -> HttpClient {
        HttpClient::with_transport(transport, ClientConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_parses_body() {
        let parsed = Arc::new(AtomicBool::new(false));
        let transport = FakeTransport::body(br#"{"a": 1, "b": 2}"#);
        let result = client(transport.clone()).fetch(&resource(parsed.clone()), None).await;

        assert_eq!(result, Ok(2));
        assert!(parsed.load(Ordering::SeqCst));
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].url().as_str(), "http://localhost:3001/things?k=v");
    }

    #[tokio::test]
    async fn test_transport_error_skips_parse() {
        let parsed = Arc::new(AtomicBool::new(false));
        let transport = FakeTransport::new(Err(HttpError::Transport("refused".into())));
        let result = client(transport).fetch(&resource(parsed.clone()), None).await;

        assert!(matches!(result, Err(HttpError::Transport(_))));
        assert!(!parsed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_no_response_and_no_data() {
        let parsed = Arc::new(AtomicBool::new(false));

        let result = client(FakeTransport::new(Ok(None)))
            .fetch(&resource(parsed.clone()), None)
            .await;
        assert_eq!(result, Err(HttpError::NoResponse));

        let result = client(FakeTransport::body(b""))
            .fetch(&resource(parsed.clone()), None)
            .await;
        assert_eq!(result, Err(HttpError::NoData));

        assert!(!parsed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_modify_request_hook_runs_last() {
        let transport = FakeTransport::body(b"{}");
        let hook: ModifyRequest = Box::new(|request| {
            request
                .headers_mut()
                .insert("content-type", "text/plain".parse().unwrap());
            request
                .headers_mut()
                .insert("authorization", "Bearer t".parse().unwrap());
        });

        let parsed = Arc::new(AtomicBool::new(false));
        client(transport.clone())
            .fetch(&resource(parsed), Some(hook))
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].headers()["authorization"], "Bearer t");
        assert_eq!(sent[0].headers()["content-type"], "text/plain");
    }

    #[tokio::test]
    async fn test_request_resource_completes_on_main_queue() {
        let (mut queue, main) = MainQueue::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let parsed = Arc::new(AtomicBool::new(false));

        let c = calls.clone();
        let task = client(FakeTransport::body(b"[1, 2, 3]")).request_resource(
            resource(parsed),
            None,
            Some(Completion::on(Arc::new(main), move |result| {
                assert_eq!(result, Ok(1));
                c.fetch_add(1, Ordering::SeqCst);
            })),
        );

        assert!(queue.run_next().await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
        assert_eq!(queue.run_pending(), 0);
    }

    #[tokio::test]
    async fn test_cancel_in_flight_request() {
        let (mut queue, main) = MainQueue::new();
        let parsed = Arc::new(AtomicBool::new(false));

        let task = client(Arc::new(Stalled)).request_resource(
            resource(parsed.clone()),
            None,
            Some(Completion::on(Arc::new(main), |_| panic!("cancelled completion ran"))),
        );

        task.cancel();
        assert!(task.is_cancelled());
        task.wait().await;

        assert_eq!(queue.run_pending(), 0);
        assert!(!parsed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_while_completion_queued() {
        let (mut queue, main) = MainQueue::new();
        let parsed = Arc::new(AtomicBool::new(false));

        let task = client(FakeTransport::body(b"{}")).request_resource(
            resource(parsed),
            None,
            Some(Completion::on(Arc::new(main), |_| panic!("cancelled completion ran"))),
        );

        // Let the network part finish so the completion sits in the queue.
        while !task.handle_is_done() {
            tokio::task::yield_now().await;
        }
        task.cancel();

        assert_eq!(queue.run_pending(), 1);
        assert!(!task.is_finished());
    }

    #[tokio::test]
    async fn test_invalid_request_is_delivered() {
        let base = Url::parse("http://localhost:3001").unwrap();
        let resource = HttpResource::new(
            base,
            "raw",
            HttpMethod::Get,
            Some(Bytes::from_static(b"not json")),
            Default::default(),
            |_| Ok(()),
        );

        let (tx, rx) = tokio::sync::oneshot::channel();
        client(FakeTransport::body(b"{}")).request_resource(
            resource,
            None,
            Some(Completion::inline(move |result| {
                let _ = tx.send(result);
            })),
        );

        assert!(matches!(rx.await.unwrap(), Err(HttpError::InvalidRequest(_))));
    }
}
