//! Labelled, human-readable view of a [`QuickInfo`].

use std::fmt;

use crate::format::{format_bitrate, format_frame_rate, format_frequency, format_pixels};

use super::types::QuickInfo;

/// QuickInfo rendered as labelled rows, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickInfoDisplay {
    rows: Vec<(&'static str, String)>,
}

impl QuickInfoDisplay {
    pub fn rows(&self) -> &[(&'static str, String)] {
        &self.rows
    }

    /// Value of the row with `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, value)| value.as_str())
    }
}

fn index(idx: Option<usize>) -> String {
    idx.map_or_else(|| "-".to_string(), |i| i.to_string())
}

impl From<&QuickInfo> for QuickInfoDisplay {
    fn from(info: &QuickInfo) -> Self {
        let rows = vec![
            ("Video Stream", index(info.video_idx)),
            ("Width", format_pixels(i64::from(info.width))),
            ("Height", format_pixels(i64::from(info.height))),
            ("Color Space", info.color_space.clone()),
            ("Video Codec", info.video_codec.clone()),
            ("Video Bit Rate", format_bitrate(info.video_bit_rate)),
            ("Frame Rate", format_frame_rate(info.frame_rate)),
            ("Audio Stream", index(info.audio_idx)),
            ("Audio Codec", info.audio_codec.clone()),
            ("Audio Bit Rate", format_bitrate(info.audio_bit_rate)),
            ("Channels", info.channels.to_string()),
            ("Sample Format", info.sample_fmt.clone()),
            ("Sample Rate", format_frequency(info.sample_rate)),
        ];
        Self { rows }
    }
}

impl fmt::Display for QuickInfoDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            writeln!(f, "{:<width$}  {}", label, value, width = width)?;
        }
        Ok(())
    }
}
