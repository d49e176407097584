//! # batch-resize
//!
//! Resize a directory (or an explicit list) of images to one target size.
//! Each source is decoded, optionally brightened, fitted into the target, and
//! written next to the others in an output directory with a suffix inserted
//! before its extension. Sources are never modified.
//!
//! # Pipeline
//!
//! ```text
//! scan          dir / paths    →  [BatchItem]        (ordered, fixed up front)
//! batch         [BatchItem]    →  BatchResult        (progress, failure isolation)
//!   operations  one source     →  one output file    (decode → brighten → fit → encode)
//! ```
//!
//! A single bad file never stops the run. Each item either produces exactly
//! one output file or is reported as failed, and the batch keeps counting.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Enumerates supported images in a directory, or wraps explicit paths |
//! | [`batch`] | Batch driver: validation, progress callbacks, cancellation, parallel runs |
//! | [`imaging`] | Pure-Rust image work: fit geometry, brightness, decode/encode backend |
//! | [`naming`] | Output path derivation (`photo.jpg` → `photo_resized.jpg`) |
//! | [`config`] | `resize.toml` loading, validation, merging |
//! | [`types`] | Shared types (`BatchItem`, `BatchResult`, JSON report) |
//! | [`output`] | CLI output formatting for progress and summaries |
//!
//! # Fit Modes
//!
//! | Mode | Output size | Distortion | Pixels lost |
//! |------|-------------|------------|-------------|
//! | `stretch` | exactly the target | yes, if ratios differ | none |
//! | `aspect-fit` | largest box inside the target | no | none |
//! | `crop-to-fill` | exactly the target | no | centered overflow |
//!
//! When both aspect-fit and crop-to-fill are requested, crop-to-fill wins.
//!
//! # Pure-Rust Imaging
//!
//! Decoding and encoding use the `image` crate with Lanczos3 resampling. No
//! system libraries are needed, so the binary runs anywhere it compiles.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
