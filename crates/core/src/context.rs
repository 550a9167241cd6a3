//! Execution contexts.
//!
//! A context is a named FIFO queue of tasks. Anything that must run on a
//! particular thread or task (observer callbacks, job completion) is posted
//! through a [`ContextHandle`] and executed by whoever drives the matching
//! [`EventLoop`]. This is the only place where work crosses from a
//! background job to its caller.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

/// A unit of work posted to a context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle for posting tasks onto a context.
///
/// This is cheaply cloneable and can be shared across tasks and threads.
#[derive(Clone)]
pub struct ContextHandle {
    name: Arc<str>,
    tx: mpsc::UnboundedSender<Task>,
}

impl ContextHandle {
    /// Name of the context this handle posts to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Post a task to run on the context.
    ///
    /// Tasks run in the order they were posted. Returns false (and logs) if
    /// the owning event loop has been dropped.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.tx.send(Box::new(task)) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(context = %self.name, "Dropping task posted to closed context");
                false
            }
        }
    }

    /// Whether the owning event loop is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("name", &self.name)
            .finish()
    }
}

/// Receiving side of a context: runs posted tasks on the caller's task.
pub struct EventLoop {
    handle: ContextHandle,
    rx: mpsc::UnboundedReceiver<Task>,
}

impl EventLoop {
    /// Create a new context with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let name: String = name.into();
        Self {
            handle: ContextHandle {
                name: Arc::from(name),
                tx,
            },
            rx,
        }
    }

    /// Returns a handle for posting tasks to this context.
    pub fn handle(&self) -> ContextHandle {
        self.handle.clone()
    }

    /// Run every task that is already queued, without waiting.
    ///
    /// Returns the number of tasks executed.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            count += 1;
        }
        count
    }

    /// Run tasks until `done` resolves, then return its value.
    ///
    /// Queued tasks take priority over the completion signal, so anything
    /// posted before the value was sent has already run when this returns.
    pub async fn run_until<T>(&mut self, mut done: oneshot::Receiver<T>) -> Option<T> {
        loop {
            tokio::select! {
                biased;
                Some(task) = self.rx.recv() => task(),
                result = &mut done => {
                    self.run_pending();
                    return result.ok();
                }
            }
        }
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("name", &self.handle.name)
            .finish()
    }
}
