//! Output path derivation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the input stem when no output path is given.
pub const OUTPUT_SUFFIX: &str = "-oc-output";

/// Derives the default output path for `input`.
///
/// `/a/b.mp4` becomes `/a/b-oc-output.mp4`. Inputs without an extension get
/// no trailing dot, and a bare relative file name stays relative.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    name.push(OUTPUT_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }

    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
