//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the transform logic and the
//! codec: it decodes a file into pixels and encodes pixels back into a file.
//! Geometry and enhancement happen in between, on plain `DynamicImage` values.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust decoders and encoders.

use super::params::EncodeParams;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Width and height of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded image together with the container format it came from.
///
/// The pixels are owned: every later stage takes the image by value and hands
/// back a new one.
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: Option<ImageFormat>,
}

impl DecodedImage {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.image.width(),
            height: self.image.height(),
        }
    }
}

/// Trait for image codec backends.
///
/// `Sync` so one backend can be shared by every worker of a parallel batch.
pub trait ImageBackend: Sync {
    /// Read and decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError>;

    /// Encode `image` and write it to `params.output`.
    ///
    /// Implementations must not leave a partial file behind on failure.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError>;
}
