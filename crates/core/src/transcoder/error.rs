//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside a backend while running a job.
///
/// These never reach the caller of a conversion: the backend primitive
/// reports a plain success flag and logs the details.
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Conversion process failed.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscoderError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }
}

/// Errors from backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The name is not a compiled-in backend.
    #[error("Undefined transcoder name: {name}")]
    InvalidBackend { name: String },

    /// No backend is available at all.
    #[error("No transcoder backend is available in this build")]
    NoBackends,
}

impl SelectError {
    /// Creates an invalid backend error.
    pub fn invalid_backend(name: impl Into<String>) -> Self {
        Self::InvalidBackend { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TranscoderError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "Conversion timed out after 30 seconds");

        let err = SelectError::invalid_backend("XYZ");
        assert_eq!(err.to_string(), "Undefined transcoder name: XYZ");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: TranscoderError = io.into();
        assert!(matches!(err, TranscoderError::Io(_)));
    }
}
