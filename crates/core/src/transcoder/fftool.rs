//! Backend driving the ffmpeg command-line tool.

use async_trait::async_trait;
use regex_lite::Regex;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;

use crate::params::{EncodeParameter, ProcessParameter};

use super::config::FfToolConfig;
use super::error::TranscoderError;
use super::traits::Transcoder;
use super::types::{ConversionJob, TranscoderKind};

/// Transcoder that spawns `ffmpeg` and follows its `-progress` output.
pub struct FfToolTranscoder {
    config: FfToolConfig,
}

impl FfToolTranscoder {
    /// Creates a new backend with the given configuration.
    pub fn new(config: FfToolConfig) -> Self {
        Self { config }
    }

    /// Creates a backend with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FfToolConfig::default())
    }

    /// Builds the ffmpeg argument list for a job.
    fn build_args(&self, input_path: &Path, output_path: &Path, params: &EncodeParameter) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
        ];

        // Video
        if let Some(ref codec) = params.video_codec {
            args.extend(["-c:v".to_string(), codec.clone()]);
        }
        if let Some(bitrate) = params.video_bit_rate {
            args.extend(["-b:v".to_string(), bitrate.to_string()]);
        }
        if let Some(qscale) = params.qscale {
            args.extend(["-q:v".to_string(), qscale.to_string()]);
        }
        if let Some(filter) = scale_filter(params.width, params.height) {
            args.extend(["-vf".to_string(), filter]);
        }
        if let Some(fps) = params.frame_rate {
            args.extend(["-r".to_string(), fps.to_string()]);
        }
        if let Some(ref pix_fmt) = params.pixel_format {
            args.extend(["-pix_fmt".to_string(), pix_fmt.clone()]);
        }

        // Audio
        if let Some(ref codec) = params.audio_codec {
            args.extend(["-c:a".to_string(), codec.clone()]);
        }
        if let Some(bitrate) = params.audio_bit_rate {
            args.extend(["-b:a".to_string(), bitrate.to_string()]);
        }
        if let Some(rate) = params.sample_rate {
            args.extend(["-ar".to_string(), rate.to_string()]);
        }

        args.extend(self.config.tool_args());

        // Output
        args.push(output_path.to_string_lossy().to_string());

        args
    }

    /// Reads the container duration with ffprobe.
    async fn probe_duration(&self, path: &Path) -> Option<f64> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: ProbeFormat,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let probe: ProbeOutput = serde_json::from_slice(&output.stdout).ok()?;
        probe
            .format
            .duration
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| *d > 0.0)
    }

    /// Runs ffmpeg for the job, reporting progress into `process`.
    async fn run_conversion(
        &self,
        job: &ConversionJob,
        process: &ProcessParameter,
    ) -> Result<(), TranscoderError> {
        if !job.input_path.exists() {
            return Err(TranscoderError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        // Ensure output directory exists
        if let Some(parent) = job.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                TranscoderError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        // Get input duration for progress calculation
        let duration_secs = self.probe_duration(&job.input_path).await;
        if duration_secs.is_none() {
            tracing::debug!(input = %job.input_path.display(), "Input duration unknown, progress will only report completion");
        }

        let args = self.build_args(&job.input_path, &job.output_path, &job.params);
        tracing::debug!(job_id = %job.job_id, ?args, "Spawning ffmpeg");

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscoderError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    TranscoderError::Io(e)
                }
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TranscoderError::conversion_failed("ffmpeg stderr not captured", None))?;
        let mut reader = BufReader::new(stderr);

        let start = Instant::now();
        let mut parser = ProgressParser::new();

        // Read progress from stderr
        let result = timeout(self.config.timeout(), async {
            let mut error_output = String::new();
            let mut buf = Vec::new();

            // Lines are not guaranteed to be UTF-8; the pipe is drained to EOF regardless.
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf).await? == 0 {
                    break;
                }
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end();

                // Capture error output
                if line.contains("Error") || line.contains("error") {
                    error_output.push_str(line);
                    error_output.push('\n');
                }

                match parser.feed(line) {
                    Some(ProgressTick::Continue(time_secs)) => {
                        if let Some(duration) = duration_secs {
                            let percent = (time_secs / duration * 100.0).min(100.0);
                            process.set_process_number(percent);
                            if let Some(remaining) =
                                estimate_remaining(start.elapsed().as_secs_f64(), percent)
                            {
                                process.set_time_required(remaining);
                            }
                        }
                    }
                    Some(ProgressTick::End) => {
                        process.set_process_number(100.0);
                        process.set_time_required(0.0);
                    }
                    None => {}
                }
            }

            // Wait for process to complete
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(TranscoderError::conversion_failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        if error_output.is_empty() {
                            None
                        } else {
                            Some(error_output)
                        },
                    ));
                }
            }
            Ok(Err(e)) => return Err(TranscoderError::Io(e)),
            Err(_) => {
                // Kill the process on timeout
                let _ = child.kill().await;
                return Err(TranscoderError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        }

        // Verify output exists
        tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| TranscoderError::conversion_failed("Output file not created", None))?;

        Ok(())
    }
}

#[async_trait]
impl Transcoder for FfToolTranscoder {
    fn kind(&self) -> TranscoderKind {
        TranscoderKind::Fftool
    }

    async fn convert_format(&self, job: &ConversionJob, process: &ProcessParameter) -> bool {
        match self.run_conversion(job, process).await {
            Ok(()) => true,
            Err(TranscoderError::ConversionFailed {
                reason,
                stderr: Some(stderr),
            }) => {
                tracing::error!(job_id = %job.job_id, %reason, stderr = %stderr.trim_end(), "FFTOOL conversion failed");
                false
            }
            Err(e) => {
                tracing::error!(job_id = %job.job_id, error = %e, "FFTOOL conversion failed");
                false
            }
        }
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        // Check ffmpeg exists
        let ffmpeg_result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffmpeg_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(TranscoderError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(TranscoderError::Io(e));
        }

        // Check ffprobe exists
        let ffprobe_result = Command::new(&self.config.ffprobe_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffprobe_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(TranscoderError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                });
            }
            return Err(TranscoderError::Io(e));
        }

        Ok(())
    }
}

/// Builds a scale filter; a missing side keeps the aspect ratio.
fn scale_filter(width: Option<u32>, height: Option<u32>) -> Option<String> {
    match (width, height) {
        (Some(w), Some(h)) => Some(format!("scale={}:{}", w, h)),
        (Some(w), None) => Some(format!("scale={}:-2", w)),
        (None, Some(h)) => Some(format!("scale=-2:{}", h)),
        (None, None) => None,
    }
}

/// Estimated seconds left, extrapolated from elapsed time and progress.
fn estimate_remaining(elapsed_secs: f64, percent: f64) -> Option<f64> {
    if percent <= 0.0 {
        return None;
    }
    Some((elapsed_secs * (100.0 - percent) / percent).max(0.0))
}

/// One block of `-progress` output.
#[derive(Debug, Clone, PartialEq)]
enum ProgressTick {
    /// A block finished; carries the current output time in seconds.
    Continue(f64),
    /// ffmpeg reported the final block.
    End,
}

/// Incremental parser for ffmpeg `-progress` key=value lines.
struct ProgressParser {
    time_regex: Option<Regex>,
    current_time: f64,
}

impl ProgressParser {
    fn new() -> Self {
        Self {
            time_regex: Regex::new(r"^out_time_ms=(\d+)").ok(),
            current_time: 0.0,
        }
    }

    /// Feeds one line; returns a tick at the end of each progress block.
    fn feed(&mut self, line: &str) -> Option<ProgressTick> {
        let line = line.trim();

        if let Some(ref re) = self.time_regex {
            if let Some(caps) = re.captures(line) {
                if let Some(us) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                    // out_time_ms is in microseconds despite its name
                    self.current_time = us / 1_000_000.0;
                }
                return None;
            }
        }

        match line.strip_prefix("progress=") {
            Some("end") => Some(ProgressTick::End),
            Some(_) => Some(ProgressTick::Continue(self.current_time)),
            None => None,
        }
    }
}
