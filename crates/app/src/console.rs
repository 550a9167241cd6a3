//! Terminal progress display.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use openconverter_core::format::{format_progress, format_time_required};
use openconverter_core::ProgressObserver;

/// Renders progress and remaining time on a single stderr line.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    last: Mutex<Status>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Status {
    percent: f64,
    seconds: f64,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, edit: impl FnOnce(&mut Status)) {
        let status = {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            edit(&mut last);
            *last
        };

        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r{}", render(status.percent, status.seconds));
        let _ = stderr.flush();
    }

    /// Ends the progress line.
    pub fn finish(&self) {
        eprintln!();
    }
}

fn render(percent: f64, seconds: f64) -> String {
    format!(
        "Progress: {:>4}  Remaining: {:>8}",
        format_progress(percent),
        format_time_required(seconds)
    )
}

impl ProgressObserver for ConsoleObserver {
    fn on_progress_update(&self, percent: f64) {
        self.update(|status| status.percent = percent);
    }

    fn on_time_update(&self, seconds: f64) {
        self.update(|status| status.seconds = seconds);
    }
}
