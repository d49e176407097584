//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`operations`](super::operations) module (which
//! decides the output geometry) and the [`backend`](super::backend) (which
//! decodes and encodes files). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`TargetSize`]: The batch-wide output box (positive width and height).
//! - [`FitMode`]: How a source is mapped onto the target box.
//! - [`Quality`]: Lossy encoding quality (1-100, default 90). Clamped on construction.
//! - [`EncodeParams`]: Output path, container format and quality for one encode.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Target geometry shared by every item of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Strategy for mapping a source image onto the target box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Resize to exactly the target, ignoring the source aspect ratio.
    #[default]
    Stretch,
    /// Largest box with the source aspect ratio that fits inside the target.
    AspectFit,
    /// Cover the target, then center-crop to exactly the target.
    CropToFill,
}

impl FitMode {
    /// Resolve the two operator toggles into a mode.
    ///
    /// Crop-to-fill is checked first, so it wins when both toggles are set.
    pub fn from_toggles(keep_aspect: bool, crop_to_fit: bool) -> Self {
        if crop_to_fit {
            FitMode::CropToFill
        } else if keep_aspect {
            FitMode::AspectFit
        } else {
            FitMode::Stretch
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FitMode::Stretch => "stretch",
            FitMode::AspectFit => "aspect-fit",
            FitMode::CropToFill => "crop-to-fill",
        };
        f.write_str(name)
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for writing one transformed image.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub format: ImageFormat,
    pub quality: Quality,
}
