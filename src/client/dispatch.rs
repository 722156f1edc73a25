//! Contexts on which completion handlers run.
//!
//! The network task finishes on whatever runtime worker happened to drive
//! it. A [`Dispatcher`] moves the completion onto the context the caller
//! nominated, typically the application's main loop, so result handling never
//! races with the code that issued the request.
//!
//! # Examples
//!
//! ```
//! use chat_adapter_http::client::{Dispatcher, MainQueue};
//!
//! let (mut queue, handle) = MainQueue::new();
//! handle.dispatch(Box::new(|| println!("on the main loop")));
//! assert_eq!(queue.run_pending(), 1);
//! ```

use tokio::sync::mpsc;

/// A unit of work handed to a [`Dispatcher`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs on some execution context.
pub trait Dispatcher: Send + Sync {
    /// Schedule `job`. It must run at most once.
    fn dispatch(&self, job: Job);
}

/// Runs the job immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Dispatcher for Inline {
    fn dispatch(&self, job: Job) {
        job()
    }
}

impl Dispatcher for tokio::runtime::Handle {
    fn dispatch(&self, job: Job) {
        self.spawn(async move { job() });
    }
}

/// The owning end of a main-loop queue.
///
/// Jobs dispatched through any [`MainQueueHandle`] run only when the owner
/// drains the queue, on the owner's thread.
#[derive(Debug)]
pub struct MainQueue {
    receiver: mpsc::UnboundedReceiver<Job>,
}

/// Cloneable sending end of a [`MainQueue`].
#[derive(Debug, Clone)]
pub struct MainQueueHandle {
    sender: mpsc::UnboundedSender<Job>,
}

impl MainQueue {
    /// Create a queue and a handle for dispatching onto it.
    pub fn new() -> (MainQueue, MainQueueHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (MainQueue { receiver }, MainQueueHandle { sender })
    }

    /// Run every job queued so far without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait for the next job and run it.
    ///
    /// Returns `false` once every handle is dropped and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }
}

impl Dispatcher for MainQueueHandle {
    fn dispatch(&self, job: Job) {
        // A closed queue means the main loop is gone; nobody is left to
        // observe the result.
        if self.sender.send(job).is_err() {
            tracing::debug!("main queue closed, dropping completion");
        }
    }
}
