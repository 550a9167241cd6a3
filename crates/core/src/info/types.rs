//! Stream metadata snapshot.

use serde::{Deserialize, Serialize};

/// Quick summary of the first video and first audio stream of a file.
///
/// Fields of a missing stream keep their zero/empty defaults and the
/// matching index is `None`. Bitrates are in bits per second, sample rate
/// in Hz.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickInfo {
    pub video_idx: Option<usize>,
    pub width: u32,
    pub height: u32,
    pub color_space: String,
    pub video_codec: String,
    pub video_bit_rate: i64,
    pub frame_rate: f64,

    pub audio_idx: Option<usize>,
    pub audio_codec: String,
    pub audio_bit_rate: i64,
    pub channels: u32,
    pub sample_fmt: String,
    pub sample_rate: i64,
}

impl QuickInfo {
    pub fn has_video(&self) -> bool {
        self.video_idx.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.audio_idx.is_some()
    }
}
