//! Output filename derivation.
//!
//! Every output keeps its source's stem and extension, with a configurable
//! suffix wedged in between:
//!
//! - `photo.JPG` + `_resized` → `photo_resized.JPG`
//! - `archive.tar.gz` + `_small` → `archive.tar_small.gz`
//! - `README` + `_resized` → `README_resized`
//!
//! There is no existence check. Two sources sharing a stem (say `a/x.png` and
//! `b/x.png`) resolve to the same output and the later one overwrites the
//! earlier. Callers that need unique names must deduplicate their inputs.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Build `output_dir/<stem><suffix><.ext>` for `source_filename`.
///
/// Only the final path component of `source_filename` is used. The extension
/// is kept exactly as given, including its case.
pub fn resolve_output_path(
    output_dir: &Path,
    source_filename: impl AsRef<OsStr>,
    suffix: &str,
) -> PathBuf {
    let source = Path::new(source_filename.as_ref());
    let stem = source.file_stem().unwrap_or_default();

    let mut name = OsString::from(stem);
    name.push(suffix);
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    output_dir.join(name)
}

/// True if `suffix` would escape the output directory or split the filename.
pub fn suffix_has_separator(suffix: &str) -> bool {
    suffix.chars().any(std::path::is_separator)
}
