//! Target encode settings.

use serde::{Deserialize, Serialize};

/// Encode knobs chosen by the user for the next conversion.
///
/// Every field is optional; `None` means "keep whatever the source has".
/// Bitrates are in bits per second, sample rate in Hz.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodeParameter {
    /// Video encoder name (e.g. "libx264").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    /// Audio encoder name (e.g. "aac").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Target video bitrate in bits per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_bit_rate: Option<i64>,
    /// Target audio bitrate in bits per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_bit_rate: Option<i64>,
    /// Output width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Output height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Output frame rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    /// Output audio sample rate in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Output pixel format (e.g. "yuv420p").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<String>,
    /// Fixed quality scale for the video encoder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qscale: Option<u8>,
}

impl EncodeParameter {
    /// Whether no knob is set, i.e. the conversion only remuxes/re-encodes
    /// with the backend defaults.
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }
}
