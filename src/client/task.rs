//! Handles for in-flight requests and their one-shot completions.

use super::dispatch::{Dispatcher, Inline};
use crate::error::Result;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A completion handler bound to the context it must run on.
pub struct Completion<T> {
    dispatcher: Arc<dyn Dispatcher>,
    handler: Box<dyn FnOnce(Result<T>) + Send + 'static>,
}

impl<T: Send + 'static> Completion<T> {
    /// Run `handler` directly on the worker that finished the request.
    pub fn inline<F>(handler: F) -> Self
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        Self::on(Arc::new(Inline), handler)
    }

    /// Run `handler` through `dispatcher`.
    pub fn on<F>(dispatcher: Arc<dyn Dispatcher>, handler: F) -> Self
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        Completion {
            dispatcher,
            handler: Box::new(handler),
        }
    }

    /// Hand `result` to the dispatcher. The handler is skipped if the task
    /// was cancelled before the dispatcher got to it.
    pub(crate) fn deliver(self, result: Result<T>, state: Arc<TaskState>) {
        let handler = self.handler;
        self.dispatcher.dispatch(Box::new(move || {
            if state.begin_completion() {
                handler(result);
            }
        }));
    }
}

const PENDING: u8 = 0;
const FINISHED: u8 = 1;
const CANCELLED: u8 = 2;

/// Shared between a [`RequestTask`] and the work it tracks.
///
/// Moves from pending to exactly one of finished or cancelled, never back.
#[derive(Debug, Default)]
pub(crate) struct TaskState {
    state: AtomicU8,
}

impl TaskState {
    /// Mark the request finished unless it was cancelled first.
    pub(crate) fn begin_completion(&self) -> bool {
        self.transition(FINISHED)
    }

    fn cancel(&self) -> bool {
        self.transition(CANCELLED)
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(PENDING, to, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn is(&self, state: u8) -> bool {
        self.state.load(Ordering::SeqCst) == state
    }
}

/// Handle to a request started with
/// [`HttpClient::request_resource`](super::HttpClient::request_resource).
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct RequestTask {
    state: Arc<TaskState>,
    handle: JoinHandle<()>,
}

impl RequestTask {
    pub(crate) fn new(state: Arc<TaskState>, handle: JoinHandle<()>) -> Self {
        RequestTask { state, handle }
    }

    /// Cancel the request.
    ///
    /// Before completion this aborts the network call and guarantees the
    /// completion handler never runs, even if its job is already queued on
    /// the target context. After completion it does nothing.
    pub fn cancel(&self) {
        if self.state.cancel() {
            self.handle.abort();
        }
    }

    /// Whether [`cancel`](Self::cancel) took effect.
    pub fn is_cancelled(&self) -> bool {
        self.state.is(CANCELLED)
    }

    /// Whether the completion ran, or the request ended with no completion
    /// attached.
    pub fn is_finished(&self) -> bool {
        self.state.is(FINISHED)
    }

    #[cfg(test)]
    pub(crate) fn handle_is_done(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait until the network part of the request has ended, either by
    /// handing its result to the dispatcher or by being cancelled.
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                tracing::error!("request task panicked: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    #[tokio::test]
    async fn test_cancel_before_delivery_suppresses_handler() {
        let state = Arc::new(TaskState::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let task = RequestTask::new(state.clone(), tokio::spawn(async {}));

        task.cancel();
        let c = calls.clone();
        Completion::<()>::inline(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .deliver(Err(HttpError::NoData), state);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(task.is_cancelled());
        assert!(!task.is_finished());
    }

    #[tokio::test]
    async fn test_cancel_after_delivery_is_noop() {
        let state = Arc::new(TaskState::default());
        let task = RequestTask::new(state.clone(), tokio::spawn(async {}));

        Completion::<u8>::inline(|result| assert_eq!(result, Ok(1))).deliver(Ok(1), state);
        task.cancel();

        assert!(task.is_finished());
        assert!(!task.is_cancelled());
        task.wait().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_racing_completion_has_one_outcome() {
        for _ in 0..500 {
            let state = Arc::new(TaskState::default());
            let task = RequestTask::new(state.clone(), tokio::spawn(async {}));
            let ran = Arc::new(AtomicBool::new(false));

            let flag = ran.clone();
            let completer = std::thread::spawn(move || {
                Completion::<()>::inline(move |_| flag.store(true, Ordering::SeqCst))
                    .deliver(Ok(()), state);
            });
            task.cancel();
            completer.join().unwrap();

            assert_ne!(task.is_cancelled(), task.is_finished());
            assert_eq!(ran.load(Ordering::SeqCst), task.is_finished());
        }
    }
}
