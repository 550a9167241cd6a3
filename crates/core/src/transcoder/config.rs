//! Settings for the FFTOOL backend (`[fftool]` in the config file).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for one ffmpeg run before it is killed.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60 * 60;

/// Log level passed to ffmpeg; `-progress` output is unaffected by it.
pub const DEFAULT_LOG_LEVEL: &str = "warning";

/// How [`FfToolTranscoder`](super::FfToolTranscoder) locates and drives
/// the ffmpeg command-line tools.
///
/// Missing keys fall back to [`Default`]: both tools resolved through
/// `PATH`, a one hour limit per job and warning-level ffmpeg logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfToolConfig {
    pub ffmpeg_path: PathBuf,

    /// Only used to read the input duration, which turns `out_time` into
    /// a percentage. Without it the job still runs but progress jumps
    /// straight to 100.
    pub ffprobe_path: PathBuf,

    pub timeout_secs: u64,

    pub ffmpeg_log_level: String,

    /// Appended after the encode knobs, right before the output path.
    pub extra_ffmpeg_args: Vec<String>,
}

impl Default for FfToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ffmpeg_log_level: DEFAULT_LOG_LEVEL.to_string(),
            extra_ffmpeg_args: Vec::new(),
        }
    }
}

impl FfToolConfig {
    /// Uses the given ffmpeg/ffprobe binaries instead of the ones on `PATH`.
    pub fn with_binaries(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Arguments that go between the encode knobs and the output path:
    /// log level, machine-readable progress on stderr, then user extras.
    pub fn tool_args(&self) -> Vec<String> {
        let mut args = vec![
            "-loglevel".to_string(),
            self.ffmpeg_log_level.clone(),
            "-progress".to_string(),
            "pipe:2".to_string(),
        ];
        args.extend(self.extra_ffmpeg_args.iter().cloned());
        args
    }
}
