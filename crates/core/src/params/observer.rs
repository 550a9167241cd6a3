//! Progress observer protocol.

use std::sync::Arc;

use crate::context::ContextHandle;

/// A listener notified of progress and time updates for a running job.
///
/// Callbacks run on the context the observer was registered with, never on
/// the reporting (background) task.
pub trait ProgressObserver: Send + Sync {
    /// Called with the job progress in percent (0.0 - 100.0).
    fn on_progress_update(&self, percent: f64);

    /// Called with the most recent time-required value in seconds.
    fn on_time_update(&self, seconds: f64);
}

/// A registered observer together with the context it is delivered on.
#[derive(Clone)]
pub(crate) struct ObserverEntry {
    pub observer: Arc<dyn ProgressObserver>,
    pub context: ContextHandle,
}

impl ObserverEntry {
    /// Whether this entry wraps the same observer instance.
    pub fn is(&self, observer: &Arc<dyn ProgressObserver>) -> bool {
        // Compare data pointers only; vtable pointers may differ per codegen unit.
        std::ptr::eq(
            Arc::as_ptr(&self.observer) as *const (),
            Arc::as_ptr(observer) as *const (),
        )
    }

    pub fn deliver_progress(&self, percent: f64) {
        let observer = Arc::clone(&self.observer);
        self.context.post(move || observer.on_progress_update(percent));
    }

    pub fn deliver_time(&self, seconds: f64) {
        let observer = Arc::clone(&self.observer);
        self.context.post(move || observer.on_time_update(seconds));
    }
}
