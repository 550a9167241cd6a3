//! FFprobe-based media probe.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::probe::{MediaProbe, ProbeError};
use super::types::QuickInfo;

/// Probes media files by running `ffprobe` and parsing its JSON output.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Parses ffprobe JSON output into QuickInfo.
    fn parse_probe_output(path: &Path, output: &str) -> Result<QuickInfo, ProbeError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            #[serde(default)]
            format: Option<ProbeFormat>,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            bit_rate: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            index: usize,
            codec_type: Option<String>,
            codec_name: Option<String>,
            bit_rate: Option<String>,
            width: Option<u32>,
            height: Option<u32>,
            color_space: Option<String>,
            r_frame_rate: Option<String>,
            channels: Option<u32>,
            sample_fmt: Option<String>,
            sample_rate: Option<String>,
        }

        let probe: ProbeOutput =
            serde_json::from_str(output).map_err(|e| ProbeError::ParseError {
                reason: e.to_string(),
            })?;

        let video = probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"));
        let audio = probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("audio"));

        if video.is_none() && audio.is_none() {
            return Err(ProbeError::NoStreams {
                path: path.to_path_buf(),
            });
        }

        let mut info = QuickInfo::default();

        if let Some(stream) = video {
            let container_rate = probe.format.as_ref().and_then(|f| f.bit_rate.as_deref());
            info.video_idx = Some(stream.index);
            info.width = stream.width.unwrap_or(0);
            info.height = stream.height.unwrap_or(0);
            info.color_space = stream.color_space.clone().unwrap_or_default();
            info.video_codec = stream.codec_name.clone().unwrap_or_default();
            info.video_bit_rate = parse_i64(stream.bit_rate.as_deref())
                .or_else(|| parse_i64(container_rate))
                .unwrap_or(0);
            info.frame_rate = stream
                .r_frame_rate
                .as_deref()
                .and_then(parse_frame_rate)
                .unwrap_or(0.0);
        }

        if let Some(stream) = audio {
            info.audio_idx = Some(stream.index);
            info.audio_codec = stream.codec_name.clone().unwrap_or_default();
            info.audio_bit_rate = parse_i64(stream.bit_rate.as_deref()).unwrap_or(0);
            info.channels = stream.channels.unwrap_or(0);
            info.sample_fmt = stream.sample_fmt.clone().unwrap_or_default();
            info.sample_rate = parse_i64(stream.sample_rate.as_deref()).unwrap_or(0);
        }

        Ok(info)
    }
}

fn parse_i64(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

/// Parses a frame rate like "24000/1001", "30/1" or "25".
fn parse_frame_rate(rate: &str) -> Option<f64> {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().ok()?;
            let den = den.parse::<f64>().ok()?;
            if den > 0.0 {
                Some(num / den)
            } else {
                None
            }
        }
        None => rate.parse::<f64>().ok(),
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn probe(&self, path: &Path) -> Result<QuickInfo, ProbeError> {
        if !path.exists() {
            return Err(ProbeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ProbeError::FfprobeNotFound {
                        path: self.ffprobe_path.clone(),
                    }
                } else {
                    ProbeError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(ProbeError::ProbeFailed {
                reason: format!(
                    "ffprobe exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(path, &stdout)
    }
}
