use super::{types::Config, ConfigError};
use crate::transcoder::TranscoderKind;

/// Validate configuration
/// Currently validates:
/// - fftool.timeout_secs is not 0
/// - transcoder.default names a known backend
/// - encode rates and dimensions are positive when set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.fftool.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fftool.timeout_secs cannot be 0".to_string(),
        ));
    }

    if let Some(name) = &config.transcoder.default {
        name.parse::<TranscoderKind>()
            .map_err(|e| ConfigError::ValidationError(format!("transcoder.default: {}", e)))?;
    }

    let encode = &config.encode;
    let positive = [
        ("encode.video_bit_rate", encode.video_bit_rate.map(|v| v > 0)),
        ("encode.audio_bit_rate", encode.audio_bit_rate.map(|v| v > 0)),
        ("encode.width", encode.width.map(|v| v > 0)),
        ("encode.height", encode.height.map(|v| v > 0)),
        ("encode.sample_rate", encode.sample_rate.map(|v| v > 0)),
        (
            "encode.frame_rate",
            encode.frame_rate.map(|v| v.is_finite() && v > 0.0),
        ),
    ];
    for (field, ok) in positive {
        if ok == Some(false) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be positive",
                field
            )));
        }
    }

    Ok(())
}
