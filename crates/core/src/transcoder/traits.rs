//! Trait definitions for the transcoder module.

use async_trait::async_trait;

use crate::params::ProcessParameter;

use super::error::TranscoderError;
use super::types::{ConversionJob, TranscoderKind};

/// A backend that performs the actual conversion.
///
/// Implementations run on a background task. They report progress through
/// `process` (`set_process_number` / `set_time_required`) and return a plain
/// success flag; failure details are logged by the backend itself.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Identifier this backend is registered under.
    fn kind(&self) -> TranscoderKind;

    /// Human readable backend name.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Converts `job.input_path` into `job.output_path` using `job.params`.
    async fn convert_format(&self, job: &ConversionJob, process: &ProcessParameter) -> bool;

    /// Checks that the backend's external toolchain is usable.
    async fn validate(&self) -> Result<(), TranscoderError> {
        Ok(())
    }
}
