//! Transcoder backends and backend selection.
//!
//! A backend implements the [`Transcoder`] trait: given a job (input path,
//! output path and an encode-settings snapshot) it runs the conversion on a
//! background task, reports progress through the shared
//! [`ProcessParameter`](crate::params::ProcessParameter) and returns a
//! success flag.
//!
//! Backends are collected in a [`TranscoderRegistry`]. Which ones exist is
//! decided at build time by cargo features:
//!
//! - `fftool` (default): [`FfToolTranscoder`], drives the ffmpeg command-line tool
//!
//! The embedding application may register further implementations (for
//! example an in-process `FFMPEG` or a `BMF` backend) before handing the
//! registry to a [`TranscoderSelector`], which keeps exactly one of them
//! active.
//!
//! # Example
//!
//! ```ignore
//! use openconverter_core::transcoder::{FfToolConfig, TranscoderRegistry, TranscoderSelector};
//!
//! let registry = TranscoderRegistry::builtin(&FfToolConfig::default());
//! let selector = TranscoderSelector::new(registry)?;
//!
//! // Unknown names are logged and ignored
//! let _ = selector.select("FFTOOL");
//! println!("Active backend: {}", selector.active());
//! ```

mod choice;
mod config;
mod error;
#[cfg(feature = "fftool")]
mod fftool;
mod registry;
mod selector;
mod traits;
mod types;

pub use choice::ExclusiveChoice;
pub use config::FfToolConfig;
pub use error::{SelectError, TranscoderError};
#[cfg(feature = "fftool")]
pub use fftool::FfToolTranscoder;
pub use registry::TranscoderRegistry;
pub use selector::TranscoderSelector;
pub use traits::Transcoder;
pub use types::{ConversionJob, TranscoderKind};
