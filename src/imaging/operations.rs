//! High-level image operations.
//!
//! These functions combine calculations with backend execution: decode a
//! source, brighten it if asked, plan and apply the fit, then hand the result
//! back to the backend for encoding.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{
    CoverFit, InvalidDimension, compute_aspect_fit, compute_cover_fit, source_crop_rect,
};
use super::enhance::apply_brightness;
use super::params::{EncodeParams, FitMode, TargetSize};
use crate::batch::{BatchConfig, CancelToken};
use crate::naming::resolve_output_path;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why a single item could not be transformed.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    InvalidDimension(#[from] InvalidDimension),
    #[error("could not decode {}: {source}", .path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("could not write {}: {source}", .path.display())]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("timed out after {}ms", .elapsed.as_millis())]
    Timeout { elapsed: Duration },
    #[error("cancelled before encoding")]
    Cancelled,
}

/// Resolved geometry for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPlan {
    /// Resize straight to the target, distorting if the ratios differ.
    Stretch { width: u32, height: u32 },
    /// Resize to an aspect-preserving box inside the target.
    Fit { width: u32, height: u32 },
    /// Resize to cover, then crop `target` out of it.
    CoverCrop { cover: CoverFit, target: TargetSize },
}

impl FitPlan {
    /// Final output dimensions after the plan is applied.
    pub fn output_dimensions(&self) -> (u32, u32) {
        match *self {
            FitPlan::Stretch { width, height } | FitPlan::Fit { width, height } => (width, height),
            FitPlan::CoverCrop { target, .. } => target.as_tuple(),
        }
    }
}

/// Plan the geometry for a source without touching any pixels.
///
/// Useful for testing parameter generation.
pub fn plan_fit(
    source: Dimensions,
    target: TargetSize,
    mode: FitMode,
) -> Result<FitPlan, InvalidDimension> {
    let src = (source.width, source.height);
    match mode {
        FitMode::CropToFill => Ok(FitPlan::CoverCrop {
            cover: compute_cover_fit(src, target.as_tuple())?,
            target,
        }),
        FitMode::AspectFit => {
            let (width, height) = compute_aspect_fit(src, target.as_tuple())?;
            Ok(FitPlan::Fit { width, height })
        }
        FitMode::Stretch => {
            if source.width == 0 || source.height == 0 {
                return Err(InvalidDimension {
                    width: source.width,
                    height: source.height,
                });
            }
            if target.width == 0 || target.height == 0 {
                return Err(InvalidDimension {
                    width: target.width,
                    height: target.height,
                });
            }
            Ok(FitPlan::Stretch {
                width: target.width,
                height: target.height,
            })
        }
    }
}

/// Apply a plan with Lanczos3 resampling. Consumes the input image.
///
/// A cover crop is taken from the source first and then resized straight to
/// the target, so memory stays bounded by the source and the target no matter
/// how large the cover box is.
pub fn apply_plan(image: DynamicImage, plan: &FitPlan) -> DynamicImage {
    match *plan {
        FitPlan::Stretch { width, height } | FitPlan::Fit { width, height } => {
            image.resize_exact(width, height, FilterType::Lanczos3)
        }
        FitPlan::CoverCrop { cover, target } => {
            let (left, top, width, height) = source_crop_rect(
                (image.width(), image.height()),
                &cover,
                target.as_tuple(),
            );
            image.crop_imm(left, top, width, height).resize_exact(
                target.width,
                target.height,
                FilterType::Lanczos3,
            )
        }
    }
}

/// Cancellation and deadline checks for one item.
///
/// Checked between stages; once encoding starts the item always runs to
/// completion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemGuard<'a> {
    cancel: Option<&'a CancelToken>,
    started: Instant,
    timeout: Option<Duration>,
}

impl<'a> ItemGuard<'a> {
    pub(crate) fn new(cancel: Option<&'a CancelToken>, timeout: Option<Duration>) -> Self {
        Self {
            cancel,
            started: Instant::now(),
            timeout,
        }
    }

    fn check(&self) -> Result<(), TransformError> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(TransformError::Cancelled);
        }
        let elapsed = self.started.elapsed();
        match self.timeout {
            Some(limit) if elapsed > limit => Err(TransformError::Timeout { elapsed }),
            _ => Ok(()),
        }
    }
}

/// Transform one source file according to `config` and return the written path.
///
/// Never modifies or deletes the source. The only side effect is the single
/// output file.
pub fn transform_one(
    backend: &impl ImageBackend,
    source: &Path,
    config: &BatchConfig,
) -> Result<PathBuf, TransformError> {
    transform_guarded(
        backend,
        source,
        config,
        &ItemGuard::new(None, config.item_timeout),
    )
}

pub(crate) fn transform_guarded(
    backend: &impl ImageBackend,
    source: &Path,
    config: &BatchConfig,
    guard: &ItemGuard<'_>,
) -> Result<PathBuf, TransformError> {
    let decode_failed = |source_err: BackendError| TransformError::DecodeFailed {
        path: source.to_path_buf(),
        source: source_err,
    };

    let file_name = source
        .file_name()
        .ok_or_else(|| decode_failed(BackendError::Decode("path has no file name".into())))?;

    let decoded = backend.decode(source).map_err(decode_failed)?;
    let dims = decoded.dimensions();
    debug!(
        "decoded {} ({}x{}, {:?})",
        source.display(),
        dims.width,
        dims.height,
        decoded.format
    );
    guard.check()?;

    let mut image = decoded.image;
    if let Some(factor) = config.brightness.filter(|f| *f != 1.0) {
        image = apply_brightness(image, factor);
    }

    let plan = plan_fit(dims, config.target, config.fit_mode)?;
    debug!("{}: {:?}", source.display(), plan);
    let image = apply_plan(image, &plan);

    let output = resolve_output_path(&config.output_dir, file_name, &config.suffix);
    let format = ImageFormat::from_path(&output)
        .ok()
        .or(decoded.format)
        .ok_or_else(|| TransformError::EncodeFailed {
            path: output.clone(),
            source: BackendError::UnsupportedFormat(
                output
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
        })?;

    // Last point at which the item can be abandoned without a partial output
    guard.check()?;

    backend
        .encode(
            &image,
            &EncodeParams {
                output: output.clone(),
                format,
                quality: config.quality,
            },
        )
        .map_err(|e| TransformError::EncodeFailed {
            path: output.clone(),
            source: e,
        })?;
    debug!("wrote {}", output.display());

    Ok(output)
}
