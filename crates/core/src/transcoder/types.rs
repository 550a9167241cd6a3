//! Types for the transcoder module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::params::EncodeParameter;

use super::error::SelectError;

/// Identifier of a transcoder backend.
///
/// Declaration order is the default-selection order: when nothing is
/// chosen explicitly the first compiled-in kind wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TranscoderKind {
    /// In-process libav based transcoder.
    Ffmpeg,
    /// The ffmpeg command-line tool.
    Fftool,
    /// BMF (ByteDance Media Framework) pipeline.
    Bmf,
}

impl TranscoderKind {
    /// Every known identifier, in default-selection order.
    pub const ALL: [TranscoderKind; 3] = [Self::Ffmpeg, Self::Fftool, Self::Bmf];

    /// Canonical identifier, as used in menus and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ffmpeg => "FFMPEG",
            Self::Fftool => "FFTOOL",
            Self::Bmf => "BMF",
        }
    }
}

impl fmt::Display for TranscoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranscoderKind {
    type Err = SelectError;

    /// Parses an identifier, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectError::invalid_backend(s))
    }
}

/// A conversion job handed to a backend.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Unique job ID.
    pub job_id: String,
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// Backend the job runs on.
    pub transcoder: TranscoderKind,
    /// Encode settings captured when the job was created.
    pub params: EncodeParameter,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
}

impl ConversionJob {
    /// Creates a job with a fresh ID.
    pub fn new(
        input_path: PathBuf,
        output_path: PathBuf,
        transcoder: TranscoderKind,
        params: EncodeParameter,
    ) -> Self {
        Self {
            job_id: uuid::Uuid::new_v4().to_string(),
            input_path,
            output_path,
            transcoder,
            params,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_names() {
        for kind in TranscoderKind::ALL {
            assert_eq!(kind.as_str().parse::<TranscoderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_parse_ignores_case() {
        assert_eq!("fftool".parse::<TranscoderKind>().unwrap(), TranscoderKind::Fftool);
        assert_eq!(" Bmf ".parse::<TranscoderKind>().unwrap(), TranscoderKind::Bmf);
    }

    #[test]
    fn test_kind_parse_unknown() {
        let err = "GSTREAMER".parse::<TranscoderKind>().unwrap_err();
        assert!(matches!(err, SelectError::InvalidBackend { ref name } if name == "GSTREAMER"));
    }

    #[test]
    fn test_kind_order() {
        assert!(TranscoderKind::Ffmpeg < TranscoderKind::Fftool);
        assert!(TranscoderKind::Fftool < TranscoderKind::Bmf);
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&TranscoderKind::Fftool).unwrap();
        assert_eq!(json, "\"FFTOOL\"");
        let parsed: TranscoderKind = serde_json::from_str("\"BMF\"").unwrap();
        assert_eq!(parsed, TranscoderKind::Bmf);
    }

    #[test]
    fn test_new_job_has_unique_id() {
        let a = ConversionJob::new(
            PathBuf::from("/in.mp4"),
            PathBuf::from("/out.mp4"),
            TranscoderKind::Fftool,
            EncodeParameter::default(),
        );
        let b = ConversionJob::new(
            PathBuf::from("/in.mp4"),
            PathBuf::from("/out.mp4"),
            TranscoderKind::Fftool,
            EncodeParameter::default(),
        );
        assert_ne!(a.job_id, b.job_id);
    }
}
