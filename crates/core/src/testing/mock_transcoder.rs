//! Mock transcoder backend for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::params::ProcessParameter;
use crate::transcoder::{ConversionJob, Transcoder, TranscoderKind};

/// Mock implementation of the Transcoder trait.
///
/// Provides controllable behavior for testing:
/// - Track submitted jobs for assertions
/// - Simulate success/failure
/// - Report a scripted progress sequence
/// - Simulate conversion time
#[derive(Debug)]
pub struct MockTranscoder {
    kind: TranscoderKind,
    jobs: Mutex<Vec<ConversionJob>>,
    invocations: AtomicUsize,
    result: AtomicBool,
    progress_steps: Vec<f64>,
    delay: Duration,
    panic: bool,
}

impl MockTranscoder {
    /// Create a mock that succeeds immediately without reporting progress.
    pub fn new(kind: TranscoderKind) -> Self {
        Self {
            kind,
            jobs: Mutex::new(Vec::new()),
            invocations: AtomicUsize::new(0),
            result: AtomicBool::new(true),
            progress_steps: Vec::new(),
            delay: Duration::ZERO,
            panic: false,
        }
    }

    /// Sets the value every conversion returns.
    pub fn with_result(self, success: bool) -> Self {
        self.set_result(success);
        self
    }

    /// Progress values reported, in order, during each conversion.
    pub fn with_progress_steps(mut self, steps: Vec<f64>) -> Self {
        self.progress_steps = steps;
        self
    }

    /// Total simulated conversion time, spread over the progress steps.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes every conversion panic.
    pub fn with_panic(mut self) -> Self {
        self.panic = true;
        self
    }

    /// Changes the value returned by later conversions.
    pub fn set_result(&self, success: bool) {
        self.result.store(success, Ordering::SeqCst);
    }

    /// Jobs received so far.
    pub fn recorded_jobs(&self) -> Vec<ConversionJob> {
        self.jobs.lock().unwrap().clone()
    }

    /// Number of `convert_format` calls.
    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn kind(&self) -> TranscoderKind {
        self.kind
    }

    async fn convert_format(&self, job: &ConversionJob, process: &ProcessParameter) -> bool {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.jobs.lock().unwrap().push(job.clone());

        if self.panic {
            panic!("mock transcoder panic for job {}", job.job_id);
        }

        let steps = self.progress_steps.len().max(1) as u32;
        let step_delay = self.delay / steps;

        for (i, percent) in self.progress_steps.iter().enumerate() {
            if !step_delay.is_zero() {
                tokio::time::sleep(step_delay).await;
            }
            process.set_process_number(*percent);
            let remaining = self.progress_steps.len() - i - 1;
            process.set_time_required(step_delay.as_secs_f64() * remaining as f64);
        }

        if self.progress_steps.is_empty() && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.result.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EncodeParameter;
    use std::path::PathBuf;

    fn job() -> ConversionJob {
        ConversionJob::new(
            PathBuf::from("/in/a.mp4"),
            PathBuf::from("/out/a.mkv"),
            TranscoderKind::Bmf,
            EncodeParameter::default(),
        )
    }

    #[tokio::test]
    async fn test_records_jobs() {
        let mock = MockTranscoder::new(TranscoderKind::Bmf);
        let process = ProcessParameter::new();

        assert!(mock.convert_format(&job(), &process).await);
        assert_eq!(mock.invocation_count(), 1);
        assert_eq!(mock.recorded_jobs()[0].output_path, PathBuf::from("/out/a.mkv"));
        assert_eq!(mock.name(), "BMF");
    }

    #[tokio::test]
    async fn test_reports_progress_steps() {
        let mock = MockTranscoder::new(TranscoderKind::Bmf).with_progress_steps(vec![10.0, 90.0]);
        let process = ProcessParameter::new();

        mock.convert_format(&job(), &process).await;
        assert_eq!(process.process_number(), 90.0);
        assert_eq!(process.time_required(), 0.0);
    }

    #[tokio::test]
    async fn test_result_override() {
        let mock = MockTranscoder::new(TranscoderKind::Bmf).with_result(false);
        let process = ProcessParameter::new();
        assert!(!mock.convert_format(&job(), &process).await);

        mock.set_result(true);
        assert!(mock.convert_format(&job(), &process).await);
    }
}
