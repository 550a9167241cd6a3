//! Media metadata extraction.
//!
//! [`MetadataExtractor`] runs a [`MediaProbe`] over a file and keeps the
//! resulting [`QuickInfo`] until the next extraction. [`QuickInfoDisplay`]
//! turns a snapshot into labelled rows for a UI.

mod display;
mod extractor;
mod ffprobe;
mod probe;
mod types;

pub use display::QuickInfoDisplay;
pub use extractor::MetadataExtractor;
pub use ffprobe::FfprobeProbe;
pub use probe::{MediaProbe, ProbeError};
pub use types::QuickInfo;
