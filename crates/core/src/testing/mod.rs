//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the backend, probe and
//! observer traits, allowing the engine to be exercised without ffmpeg.
//!
//! # Example
//!
//! ```rust,ignore
//! use openconverter_core::testing::{MockTranscoder, RecordingObserver};
//! use openconverter_core::transcoder::TranscoderKind;
//!
//! let backend = MockTranscoder::new(TranscoderKind::Fftool)
//!     .with_progress_steps(vec![25.0, 50.0, 75.0])
//!     .with_result(true);
//! let observer = RecordingObserver::new();
//!
//! // Register both, run a conversion...
//! assert_eq!(observer.progress_values(), vec![25.0, 50.0, 75.0, 100.0]);
//! ```

mod mock_probe;
mod mock_transcoder;
mod recording_observer;

pub use mock_probe::MockProbe;
pub use mock_transcoder::MockTranscoder;
pub use recording_observer::{ObservedEvent, RecordingObserver};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::info::QuickInfo;
    use crate::params::EncodeParameter;

    /// A 1080p H.264 / AAC stereo file.
    pub fn quick_info() -> QuickInfo {
        QuickInfo {
            video_idx: Some(0),
            width: 1920,
            height: 1080,
            color_space: "bt709".to_string(),
            video_codec: "h264".to_string(),
            video_bit_rate: 4_500_000,
            frame_rate: 29.97,
            audio_idx: Some(1),
            audio_codec: "aac".to_string(),
            audio_bit_rate: 128_000,
            channels: 2,
            sample_fmt: "fltp".to_string(),
            sample_rate: 48_000,
        }
    }

    /// Encode settings for a 720p H.264 / AAC target.
    pub fn encode_720p() -> EncodeParameter {
        EncodeParameter {
            video_codec: Some("libx264".to_string()),
            audio_codec: Some("aac".to_string()),
            video_bit_rate: Some(2_500_000),
            audio_bit_rate: Some(128_000),
            width: Some(1280),
            height: Some(720),
            ..Default::default()
        }
    }
}
