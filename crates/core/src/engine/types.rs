//! Types for the conversion engine.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::context::EventLoop;
use crate::transcoder::TranscoderKind;

/// Reasons a conversion request is rejected before any job starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// No input file was given.
    #[error("Please select an input file.")]
    EmptyInput,

    /// The output path is the input path.
    #[error("The input file can't be the same as the output file: {}", path.display())]
    SamePath { path: PathBuf },

    /// Another job is still running on this engine.
    #[error("A conversion is already in progress")]
    Busy,

    /// `convert` was called outside a tokio runtime.
    #[error("No tokio runtime available to run the conversion")]
    NoRuntime,
}

/// Final result of a conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success,
    Failure,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<bool> for ConversionOutcome {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("Convert Success"),
            Self::Failure => f.write_str("Convert Failed! Please check your input and output file paths."),
        }
    }
}

/// Handle to an in-flight conversion.
///
/// Resolves exactly once, from a task posted to the caller's context. That
/// context has to be driven (for example with [`wait_on`](Self::wait_on))
/// for the handle to resolve.
#[derive(Debug)]
pub struct JobHandle {
    pub(crate) job_id: String,
    pub(crate) input_path: PathBuf,
    pub(crate) output_path: PathBuf,
    pub(crate) transcoder: TranscoderKind,
    pub(crate) done: oneshot::Receiver<ConversionOutcome>,
}

impl JobHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Backend the job was dispatched to.
    pub fn transcoder(&self) -> TranscoderKind {
        self.transcoder
    }

    /// Waits for the outcome while the caller's context is driven elsewhere.
    ///
    /// A completion that can no longer be delivered (the context was
    /// dropped) counts as a failure.
    pub async fn wait(self) -> ConversionOutcome {
        self.done.await.unwrap_or(ConversionOutcome::Failure)
    }

    /// Drives `context` until the outcome arrives.
    ///
    /// Every progress notification queued on `context` before completion
    /// has run by the time this returns.
    pub async fn wait_on(self, context: &mut EventLoop) -> ConversionOutcome {
        context
            .run_until(self.done)
            .await
            .unwrap_or(ConversionOutcome::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_bool() {
        assert!(ConversionOutcome::from(true).is_success());
        assert_eq!(ConversionOutcome::from(false), ConversionOutcome::Failure);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ConvertError::EmptyInput.to_string(), "Please select an input file.");
        let err = ConvertError::SamePath {
            path: PathBuf::from("/a/b.mp4"),
        };
        assert_eq!(
            err.to_string(),
            "The input file can't be the same as the output file: /a/b.mp4"
        );
    }

    #[tokio::test]
    async fn test_dropped_sender_is_failure() {
        let (tx, rx) = oneshot::channel();
        let handle = JobHandle {
            job_id: "job".to_string(),
            input_path: PathBuf::from("in.mp4"),
            output_path: PathBuf::from("out.mp4"),
            transcoder: TranscoderKind::Fftool,
            done: rx,
        };
        drop(tx);
        assert_eq!(handle.wait().await, ConversionOutcome::Failure);
    }
}
