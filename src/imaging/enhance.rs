//! Brightness adjustment applied before any geometry change.

use image::{DynamicImage, ImageBuffer, Pixel};

/// Factor used when brightening is switched on without an explicit value.
pub const DEFAULT_BRIGHTEN_FACTOR: f32 = 1.2;

/// Multiply every color channel by `factor`, clamping to the channel range.
///
/// `1.0` is a no-op, larger values brighten and smaller values darken. Alpha is
/// left untouched. 8-bit images keep their pixel layout; deeper images are
/// converted to RGBA8 first.
pub fn apply_brightness(image: DynamicImage, factor: f32) -> DynamicImage {
    if factor == 1.0 {
        return image;
    }
    match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(scale_buffer(buf, factor, false)),
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(scale_buffer(buf, factor, true))
        }
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(scale_buffer(buf, factor, false)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(scale_buffer(buf, factor, true)),
        other => DynamicImage::ImageRgba8(scale_buffer(other.to_rgba8(), factor, true)),
    }
}

/// `has_alpha` marks the last channel as alpha, which is left as is.
fn scale_buffer<P>(
    mut buf: ImageBuffer<P, Vec<u8>>,
    factor: f32,
    has_alpha: bool,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let channels = P::CHANNEL_COUNT as usize;
    let color_channels = if has_alpha { channels - 1 } else { channels };
    for pixel in buf.pixels_mut() {
        for c in pixel.channels_mut().iter_mut().take(color_channels) {
            *c = (*c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn brighten_scales_rgb_channels() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([100, 50, 10])));
        let out = apply_brightness(img, 1.2).to_rgb8();
        assert_eq!(out.get_pixel(0, 0), &Rgb([120, 60, 12]));
    }

    #[test]
    fn brighten_clamps_at_white() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([250, 220, 0])));
        let out = apply_brightness(img, 1.2).to_rgb8();
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 0]));
    }

    #[test]
    fn darken_halves_channels() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([200])));
        let out = apply_brightness(img, 0.5);
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
        assert_eq!(out.to_luma8().get_pixel(0, 0), &Luma([100]));
    }

    #[test]
    fn alpha_is_preserved() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([100, 100, 100, 40])));
        let out = apply_brightness(img, 2.0).to_rgba8();
        assert_eq!(out.get_pixel(0, 0), &Rgba([200, 200, 200, 40]));
    }

    #[test]
    fn unit_factor_is_noop() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])));
        let out = apply_brightness(img.clone(), 1.0);
        assert_eq!(out, img);
    }

    #[test]
    fn sixteen_bit_input_becomes_rgba8() {
        let img = DynamicImage::new_rgb16(2, 2);
        let out = apply_brightness(img, 1.5);
        assert!(matches!(out, DynamicImage::ImageRgba8(_)));
        assert_eq!((out.width(), out.height()), (2, 2));
    }
}
