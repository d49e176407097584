//! Pure Rust codec backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, GIF, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode → everything else | `DynamicImage::write_to` with the source's format |
//!
//! Outputs are written to a hidden sibling file and renamed into place, so a
//! failed encode never leaves a truncated image at the final path.

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::params::EncodeParams;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert to a pixel layout the target encoder accepts.
fn encodable(image: &DynamicImage, format: ImageFormat) -> Option<DynamicImage> {
    match (format, image) {
        (ImageFormat::Jpeg, DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_)) => None,
        (ImageFormat::Jpeg, img) => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        (ImageFormat::Gif, DynamicImage::ImageRgba8(_)) => None,
        (ImageFormat::Gif, img) => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
        (
            ImageFormat::Bmp | ImageFormat::WebP,
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_),
        ) => None,
        (ImageFormat::Bmp | ImageFormat::WebP, img) => {
            Some(DynamicImage::ImageRgba8(img.to_rgba8()))
        }
        _ => None,
    }
}

/// `photo_resized.jpg` → `.photo_resized.jpg.part` in the same directory.
fn staging_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!(".{name}.part"))
}

fn write_encoded(
    image: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: u8,
) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            image
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
        }
        other => {
            image
                .write_to(&mut writer, other)
                .map_err(|e| BackendError::Encode(format!("{other:?} encode failed: {e}")))?;
        }
    }
    writer.flush()?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let image = reader.decode().map_err(|e| {
            BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        Ok(DecodedImage { image, format })
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
        if !params.format.writing_enabled() {
            return Err(BackendError::UnsupportedFormat(format!(
                "{:?}",
                params.format
            )));
        }

        let converted = encodable(image, params.format);
        let image = converted.as_ref().unwrap_or(image);

        let staging = staging_path(&params.output);
        let quality = params.quality.value() as u8;
        if let Err(e) = write_encoded(image, &staging, params.format, quality) {
            std::fs::remove_file(&staging).ok();
            return Err(e);
        }
        if let Err(e) = std::fs::rename(&staging, &params.output) {
            std::fs::remove_file(&staging).ok();
            return Err(BackendError::Io(e));
        }
        Ok(())
    }
}
