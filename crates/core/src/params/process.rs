//! Live job state and the observer registry.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::ContextHandle;
use crate::transcoder::TranscoderKind;

use super::observer::{ObserverEntry, ProgressObserver};

/// Status of the current or most recent job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// No job has run yet.
    Idle,
    /// A job is in flight.
    Running,
    /// The last job finished successfully.
    Succeeded,
    /// The last job failed.
    Failed,
}

/// Point-in-time copy of the process state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub progress: f64,
    pub time_required: f64,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcoder: Option<TranscoderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for ProcessSnapshot {
    fn default() -> Self {
        Self {
            progress: 0.0,
            time_required: 0.0,
            status: JobStatus::Idle,
            transcoder: None,
            job_id: None,
            started_at: None,
        }
    }
}

/// Live state of the current job plus the set of registered observers.
///
/// Created once at startup and shared (`Arc`) between the UI, the engine
/// and the running backend. Progress and time updates are broadcast to
/// every registered observer, in registration order, on the observer's own
/// context.
#[derive(Default)]
pub struct ProcessParameter {
    state: RwLock<ProcessSnapshot>,
    observers: RwLock<Vec<ObserverEntry>>,
}

impl ProcessParameter {
    /// Creates an idle process parameter with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer delivered on `context`.
    ///
    /// Returns false if this observer instance is already registered (it
    /// keeps its original registration and is still notified once) or if
    /// `context` has already shut down.
    pub fn add_observer(
        &self,
        observer: Arc<dyn ProgressObserver>,
        context: &ContextHandle,
    ) -> bool {
        if context.is_closed() {
            tracing::debug!(context = context.name(), "Context closed, observer not registered");
            return false;
        }
        let mut observers = write(&self.observers);
        if observers.iter().any(|entry| entry.is(&observer)) {
            tracing::debug!("Observer already registered, ignoring");
            return false;
        }
        observers.push(ObserverEntry {
            observer,
            context: context.clone(),
        });
        true
    }

    /// Unregisters an observer. Returns false if it was not registered.
    pub fn remove_observer(&self, observer: &Arc<dyn ProgressObserver>) -> bool {
        let mut observers = write(&self.observers);
        let before = observers.len();
        observers.retain(|entry| !entry.is(observer));
        observers.len() != before
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        read(&self.observers).len()
    }

    /// Reports job progress in percent and notifies observers.
    ///
    /// Values are clamped to 0-100. While a job is running progress never
    /// goes backwards: lower values are dropped without notification.
    pub fn set_process_number(&self, percent: f64) {
        if !percent.is_finite() {
            tracing::debug!(percent, "Ignoring non-finite progress value");
            return;
        }
        let percent = percent.clamp(0.0, 100.0);

        let mut state = write(&self.state);
        if state.status == JobStatus::Running && percent < state.progress {
            tracing::trace!(
                percent,
                current = state.progress,
                "Ignoring decreasing progress value"
            );
            return;
        }
        state.progress = percent;

        // Broadcast while holding the state lock so every observer sees
        // values in the order they were stored.
        for entry in read(&self.observers).iter() {
            entry.deliver_progress(percent);
        }
    }

    /// Current progress in percent.
    pub fn process_number(&self) -> f64 {
        read(&self.state).progress
    }

    /// Reports the time-required value in seconds and notifies observers.
    ///
    /// Negative or non-finite values are ignored.
    pub fn set_time_required(&self, seconds: f64) {
        if !seconds.is_finite() || seconds < 0.0 {
            tracing::debug!(seconds, "Ignoring invalid time value");
            return;
        }

        let mut state = write(&self.state);
        state.time_required = seconds;
        for entry in read(&self.observers).iter() {
            entry.deliver_time(seconds);
        }
    }

    /// Most recent time-required value in seconds.
    pub fn time_required(&self) -> f64 {
        read(&self.state).time_required
    }

    /// Status of the current or most recent job.
    pub fn status(&self) -> JobStatus {
        read(&self.state).status
    }

    /// Backend used by the current or most recent job.
    pub fn transcoder(&self) -> Option<TranscoderKind> {
        read(&self.state).transcoder
    }

    /// Copy of the whole process state.
    pub fn snapshot(&self) -> ProcessSnapshot {
        read(&self.state).clone()
    }

    /// Resets progress and marks a new job as running.
    pub(crate) fn begin_job(&self, job_id: &str, transcoder: TranscoderKind) {
        let mut state = write(&self.state);
        *state = ProcessSnapshot {
            progress: 0.0,
            time_required: 0.0,
            status: JobStatus::Running,
            transcoder: Some(transcoder),
            job_id: Some(job_id.to_string()),
            started_at: Some(Utc::now()),
        };
    }

    /// Records the final status of the running job.
    pub(crate) fn finish_job(&self, success: bool) {
        let mut state = write(&self.state);
        state.status = if success {
            JobStatus::Succeeded
        } else {
            JobStatus::Failed
        };
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
