//! Media probe trait and errors.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::types::QuickInfo;

/// Errors that can occur while probing a media file.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The probe tool ran but reported an error.
    #[error("Failed to probe media: {reason}")]
    ProbeFailed { reason: String },

    /// Probe output could not be parsed.
    #[error("Failed to parse probe output: {reason}")]
    ParseError { reason: String },

    /// Neither a video nor an audio stream was found.
    #[error("No audio or video stream found in {path}")]
    NoStreams { path: PathBuf },

    /// I/O error while running the probe.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads stream metadata from a media file.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Returns the probe name (for logging).
    fn name(&self) -> &str;

    /// Probes `path` for its first video and first audio stream.
    async fn probe(&self, path: &Path) -> Result<QuickInfo, ProbeError>;
}
