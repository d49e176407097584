//! Image processing in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from content) |
//! | **Brighten** | per-channel multiply, see [`enhance`] |
//! | **Resize** | `DynamicImage::resize_exact` with `Lanczos3` |
//! | **Crop** | `DynamicImage::crop_imm` on the source region behind the centered cover crop |
//! | **Encode** | `image` encoders, same format as the source |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Enhance**: Brightness scaling on decoded pixels
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod enhance;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, Dimensions, ImageBackend};
pub use calculations::{
    CoverFit, InvalidDimension, compute_aspect_fit, compute_cover_fit, source_crop_rect,
};
pub use enhance::{DEFAULT_BRIGHTEN_FACTOR, apply_brightness};
pub use operations::{FitPlan, TransformError, apply_plan, plan_fit, transform_one};
pub use params::{EncodeParams, FitMode, Quality, TargetSize};
pub use rust_backend::RustBackend;
