//! Observer that records every notification.

use std::sync::Mutex;

use crate::params::ProgressObserver;

/// One notification received by a [`RecordingObserver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservedEvent {
    Progress(f64),
    Time(f64),
}

/// ProgressObserver that keeps every notification in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification, in arrival order.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress_values(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ObservedEvent::Progress(percent) => Some(percent),
                ObservedEvent::Time(_) => None,
            })
            .collect()
    }

    pub fn time_values(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ObservedEvent::Time(seconds) => Some(seconds),
                ObservedEvent::Progress(_) => None,
            })
            .collect()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_progress_update(&self, percent: f64) {
        self.events.lock().unwrap().push(ObservedEvent::Progress(percent));
    }

    fn on_time_update(&self, seconds: f64) {
        self.events.lock().unwrap().push(ObservedEvent::Time(seconds));
    }
}
