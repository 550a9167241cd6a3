//! Conversion engine.
//!
//! Validates a conversion request, derives the default output path, then
//! runs the selected backend on a background task:
//! - **Preconditions**: synchronous, rejected requests never reach a backend
//! - **Job**: one at a time per engine, with a parameter snapshot taken at start
//! - **Completion**: posted to the caller's context after all progress posts

mod paths;
mod runner;
mod types;

pub use paths::{derive_output_path, OUTPUT_SUFFIX};
pub use runner::ConversionEngine;
pub use types::{ConversionOutcome, ConvertError, JobHandle};
