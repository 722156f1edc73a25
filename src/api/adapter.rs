//! Request wrapper for the chat adapter service.
//!
//! [`ChatAdapter`] bundles the API location, a shared [`HttpClient`], the
//! context completions must run on, and an [`ApiObserver`] that sees every
//! request and outcome. Application code talks to the service only through
//! it.
//!
//! ```ignore
//! use chat_adapter_http::api::{ChatAdapter, ChatAdapterApi};
//! use chat_adapter_http::client::{HttpClient, MainQueue};
//! use std::sync::Arc;
//!
//! let (mut main_loop, main) = MainQueue::new();
//! let adapter = ChatAdapter::new(ChatAdapterApi::development()?, HttpClient::new(), Arc::new(main));
//!
//! adapter.request_login("alice", "secret", |result| match result {
//!     Ok(info) => println!("connect to {}", info.server_address()),
//!     Err(e) => eprintln!("login failed: {}", e),
//! })?;
//!
//! main_loop.run_next().await;
//! ```

use super::account::{login_resource, LoginInfo, DEFAULT_LOGIN_TYPE};
use super::{error_with_code, ChatAdapterApi, ErrorCode};
use crate::client::{
    curl_command_line, Completion, Dispatcher, HttpClient, HttpResource, ModifyRequest, RequestTask,
};
use crate::error::{HttpError, Result};
use crate::json::{parse_json, JsonObject};
use reqwest::Request;
use std::fmt;
use std::sync::Arc;

/// Sees chat adapter traffic. All hooks default to doing nothing.
pub trait ApiObserver: Send + Sync {
    /// Called with the final request, after any caller hook.
    fn will_send(&self, _request: &Request) {}

    /// Called with the decoded body of every response that is a JSON
    /// object, before it is checked for an application error.
    fn did_receive_json(&self, _json: &JsonObject) {}

    /// Called with the parsed value of a successful call.
    fn did_succeed(&self, _resource: &str, _value: &dyn fmt::Debug) {}

    /// Called with the error of a failed call.
    fn did_fail(&self, _resource: &str, _error: &HttpError) {}
}

/// Logs chat adapter traffic through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ApiObserver for TracingObserver {
    fn will_send(&self, request: &Request) {
        tracing::info!("ChatAdapter request: {} {}", request.method(), request.url());
        tracing::debug!("cURL:\n{}", curl_command_line(request));
    }

    fn did_receive_json(&self, json: &JsonObject) {
        tracing::debug!(
            "ChatAdapter JSON:\n{}",
            serde_json::to_string_pretty(json).unwrap_or_default()
        );
    }

    fn did_succeed(&self, resource: &str, value: &dyn fmt::Debug) {
        tracing::info!("ChatAdapter response: {:?}", value);
        tracing::debug!("Resource: {}", resource);
    }

    fn did_fail(&self, resource: &str, error: &HttpError) {
        tracing::warn!("ChatAdapter error: {}", error);
        tracing::debug!("Resource: {}", resource);
    }
}

/// Entry point for calls to the chat adapter.
#[derive(Clone)]
pub struct ChatAdapter {
    api: ChatAdapterApi,
    client: HttpClient,
    dispatcher: Arc<dyn Dispatcher>,
    observer: Arc<dyn ApiObserver>,
    login_type: String,
}

impl ChatAdapter {
    /// Adapter delivering completions on `dispatcher`, logging with
    /// [`TracingObserver`].
    pub fn new(api: ChatAdapterApi, client: HttpClient, dispatcher: Arc<dyn Dispatcher>) -> Self {
        ChatAdapter {
            api,
            client,
            dispatcher,
            observer: Arc::new(TracingObserver),
            login_type: DEFAULT_LOGIN_TYPE.to_string(),
        }
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: Arc<dyn ApiObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Login `type` parameter, `"tel"` unless changed.
    pub fn with_login_type(mut self, login_type: impl Into<String>) -> Self {
        self.login_type = login_type.into();
        self
    }

    /// The API location.
    pub fn api(&self) -> &ChatAdapterApi {
        &self.api
    }

    /// Issue `resource`, delivering the result on the adapter's dispatcher.
    pub fn request<T, F>(
        &self,
        resource: HttpResource<T>,
        modify_request: Option<ModifyRequest>,
        completion: F,
    ) -> RequestTask
    where
        T: fmt::Debug + Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let description = resource.to_string();
        let resource = self.observe(resource);
        let observer = Arc::clone(&self.observer);

        let completion = Completion::on(Arc::clone(&self.dispatcher), move |result: Result<T>| {
            report(observer.as_ref(), &description, &result);
            completion(result);
        });

        self.client
            .request_resource(resource, Some(self.hook(modify_request)), Some(completion))
    }

    /// Issue `resource` and await the result on the current task.
    pub async fn fetch<T>(&self, resource: &HttpResource<T>, modify_request: Option<ModifyRequest>) -> Result<T>
    where
        T: fmt::Debug + 'static,
    {
        let observed = self.observe(resource.clone());
        let result = self.client.fetch(&observed, Some(self.hook(modify_request))).await;
        report(self.observer.as_ref(), &resource.to_string(), &result);
        result
    }

    /// Log in, delivering [`LoginInfo`] on the adapter's dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::ParametersError`] straight away, without a
    /// request, when `account` or `password` is empty.
    pub fn request_login<F>(&self, account: &str, password: &str, completion: F) -> Result<RequestTask>
    where
        F: FnOnce(Result<LoginInfo>) + Send + 'static,
    {
        let resource = self.login(account, password)?;
        Ok(self.request(resource, None, completion))
    }

    /// Log in and await the result.
    pub async fn fetch_login(&self, account: &str, password: &str) -> Result<LoginInfo> {
        let resource = self.login(account, password)?;
        self.fetch(&resource, None).await
    }

    fn login(&self, account: &str, password: &str) -> Result<HttpResource<LoginInfo>> {
        if account.is_empty() || password.is_empty() {
            return Err(error_with_code(ErrorCode::ParametersError.code()));
        }
        Ok(login_resource(&self.api, account, password, &self.login_type))
    }

    fn observe<T: 'static>(&self, resource: HttpResource<T>) -> HttpResource<T> {
        let observer = Arc::clone(&self.observer);
        resource.inspect(move |data| {
            if let Some(json) = parse_json(data) {
                observer.did_receive_json(&json);
            }
        })
    }

    fn hook(&self, modify_request: Option<ModifyRequest>) -> ModifyRequest {
        let observer = Arc::clone(&self.observer);
        Box::new(move |request: &mut Request| {
            if let Some(modify) = modify_request {
                modify(request);
            }
            observer.will_send(request);
        })
    }
}

fn report<T: fmt::Debug>(observer: &dyn ApiObserver, resource: &str, result: &Result<T>) {
    match result {
        Ok(value) => observer.did_succeed(resource, value),
        Err(error) => observer.did_fail(resource, error),
    }
}
