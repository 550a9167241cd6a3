//! Conversion engine implementation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::context::ContextHandle;
use crate::params::{ParameterStore, ProcessParameter};
use crate::transcoder::{ConversionJob, Transcoder, TranscoderSelector};

use super::paths::derive_output_path;
use super::types::{ConversionOutcome, ConvertError, JobHandle};

/// Runs one conversion job at a time on a background task.
///
/// Completion is posted to the context the engine was created with, so the
/// caller never observes results from a foreign thread.
pub struct ConversionEngine {
    selector: Arc<TranscoderSelector>,
    store: Arc<ParameterStore>,
    context: ContextHandle,
    busy: Arc<AtomicBool>,
}

impl ConversionEngine {
    /// Create a new engine delivering completions on `context`.
    pub fn new(
        selector: Arc<TranscoderSelector>,
        store: Arc<ParameterStore>,
        context: ContextHandle,
    ) -> Self {
        Self {
            selector,
            store,
            context,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn selector(&self) -> &Arc<TranscoderSelector> {
        &self.selector
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    /// Whether a job is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts converting `input_path` into `output_path`.
    ///
    /// An empty `output_path` is replaced by the derived default, so the
    /// caller can show the path that will actually be written. Returns
    /// immediately; the job runs on a spawned tokio task.
    pub fn convert(
        &self,
        input_path: &Path,
        output_path: &mut PathBuf,
    ) -> Result<JobHandle, ConvertError> {
        if input_path.as_os_str().is_empty() {
            warn!("Conversion requested without an input file");
            return Err(ConvertError::EmptyInput);
        }

        if output_path.as_os_str().is_empty() {
            *output_path = derive_output_path(input_path);
            debug!(output = %output_path.display(), "Derived default output path");
        }

        if output_path.as_path() == input_path {
            warn!(path = %input_path.display(), "Input and output paths are the same");
            return Err(ConvertError::SamePath {
                path: input_path.to_path_buf(),
            });
        }

        let runtime = Handle::try_current().map_err(|_| ConvertError::NoRuntime)?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(input = %input_path.display(), "Conversion already in progress, rejecting request");
            return Err(ConvertError::Busy);
        }

        let transcoder = self.selector.active_transcoder();
        let job = ConversionJob::new(
            input_path.to_path_buf(),
            output_path.clone(),
            transcoder.kind(),
            self.store.snapshot(),
        );
        let process = Arc::clone(self.store.process());
        process.begin_job(&job.job_id, job.transcoder);

        info!(
            job_id = %job.job_id,
            transcoder = %job.transcoder,
            input = %job.input_path.display(),
            output = %job.output_path.display(),
            "Starting conversion"
        );

        let (tx, rx) = oneshot::channel();
        let handle = JobHandle {
            job_id: job.job_id.clone(),
            input_path: job.input_path.clone(),
            output_path: job.output_path.clone(),
            transcoder: job.transcoder,
            done: rx,
        };

        let busy = Arc::clone(&self.busy);
        let context = self.context.clone();
        runtime.spawn(async move {
            let job_id = job.job_id.clone();
            let started_at = job.created_at;

            let success = run_job(transcoder, job, Arc::clone(&process)).await;
            if success {
                process.set_process_number(100.0);
                process.set_time_required(0.0);
            }
            process.finish_job(success);
            busy.store(false, Ordering::Release);

            let outcome = ConversionOutcome::from(success);
            let elapsed = chrono::Utc::now() - started_at;
            info!(
                job_id = %job_id,
                %outcome,
                elapsed_ms = elapsed.num_milliseconds(),
                "Conversion finished"
            );

            if !context.post(move || {
                let _ = tx.send(outcome);
            }) {
                warn!(job_id = %job_id, "Caller context closed, conversion result dropped");
            }
        });

        Ok(handle)
    }
}

/// Runs the backend on its own task so a panic inside it still yields a result.
async fn run_job(
    transcoder: Arc<dyn Transcoder>,
    job: ConversionJob,
    process: Arc<ProcessParameter>,
) -> bool {
    let job_id = job.job_id.clone();
    let task = tokio::spawn(async move { transcoder.convert_format(&job, &process).await });

    match task.await {
        Ok(success) => success,
        Err(e) => {
            error!(job_id = %job_id, error = %e, "Transcoder task aborted");
            false
        }
    }
}
