use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::params::EncodeParameter;
use crate::transcoder::FfToolConfig;

/// Root configuration
///
/// Every section is optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    #[serde(default)]
    pub fftool: FfToolConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Initial encode settings.
    #[serde(default)]
    pub encode: EncodeParameter,
}

/// Backend selection
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TranscoderConfig {
    /// Backend selected at startup (e.g. "FFTOOL"). The first available
    /// backend is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Metadata probe configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}
