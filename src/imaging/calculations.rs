//! Pure calculation functions for output geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use thiserror::Error;

/// A zero width or height was handed to a geometry calculation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid dimension {width}x{height}: width and height must be positive")]
pub struct InvalidDimension {
    pub width: u32,
    pub height: u32,
}

fn check(width: u32, height: u32) -> Result<(), InvalidDimension> {
    if width == 0 || height == 0 {
        return Err(InvalidDimension { width, height });
    }
    Ok(())
}

/// Calculate the largest box with the source's aspect ratio that fits in the target.
///
/// One edge always matches the target exactly; the other is rounded to the
/// nearest pixel and never exceeds its target edge. Small sources are scaled
/// up, large ones shrunk.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Bounding box (width, height)
///
/// # Examples
/// ```
/// # use batch_resize::imaging::compute_aspect_fit;
/// // 800x600 (4:3) into a 400x400 box → 400x300
/// assert_eq!(compute_aspect_fit((800, 600), (400, 400)).unwrap(), (400, 300));
/// ```
pub fn compute_aspect_fit(
    source: (u32, u32),
    target: (u32, u32),
) -> Result<(u32, u32), InvalidDimension> {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    check(src_w, src_h)?;
    check(tgt_w, tgt_h)?;

    let (src_w, src_h) = (src_w as u64, src_h as u64);
    let (tgt_w64, tgt_h64) = (tgt_w as u64, tgt_h as u64);

    if src_w * tgt_h64 > tgt_w64 * src_h {
        // Source is wider: width is the binding edge
        let h = round_div(tgt_w64 * src_h, src_w).clamp(1, tgt_h64) as u32;
        Ok((tgt_w, h))
    } else {
        // Source is taller (or same ratio): height is the binding edge
        let w = round_div(tgt_h64 * src_w, src_h).clamp(1, tgt_w64) as u32;
        Ok((w, tgt_h))
    }
}

/// Integer division rounding half up. Never overflows for any `u64` inputs.
fn round_div(num: u64, den: u64) -> u64 {
    num / den + u64::from(num % den >= den.div_ceil(2))
}

/// Oversized cover size plus the centered crop that yields the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFit {
    pub cover_width: u32,
    pub cover_height: u32,
    pub crop_left: u32,
    pub crop_top: u32,
}

/// Calculate dimensions that completely cover the target, then center a crop in them.
///
/// When the source is strictly wider than the target ratio, height is held at
/// the target and width grows; otherwise width is held and height grows. The
/// grown edge is truncated toward zero. Crop offsets use floor division, so an
/// odd overflow leaves the smaller half on the left/top.
///
/// # Examples
/// ```
/// # use batch_resize::imaging::{compute_cover_fit, CoverFit};
/// // 200x100 into 100x100: cover 200x100, crop starts 50px in
/// let fit = compute_cover_fit((200, 100), (100, 100)).unwrap();
/// assert_eq!(
///     fit,
///     CoverFit { cover_width: 200, cover_height: 100, crop_left: 50, crop_top: 0 }
/// );
/// ```
pub fn compute_cover_fit(
    source: (u32, u32),
    target: (u32, u32),
) -> Result<CoverFit, InvalidDimension> {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    check(src_w, src_h)?;
    check(tgt_w, tgt_h)?;

    let src_aspect = src_w as f64 / src_h as f64;

    // Exact ratio comparison: src_w/src_h > tgt_w/tgt_h
    let (cover_w, cover_h) = if src_w as u64 * tgt_h as u64 > tgt_w as u64 * src_h as u64 {
        let w = (tgt_h as f64 * src_aspect) as u32;
        (w.max(tgt_w), tgt_h)
    } else {
        let h = (tgt_w as f64 / src_aspect) as u32;
        (tgt_w, h.max(tgt_h))
    };

    Ok(CoverFit {
        cover_width: cover_w,
        cover_height: cover_h,
        crop_left: (cover_w - tgt_w) / 2,
        crop_top: (cover_h - tgt_h) / 2,
    })
}

/// The region of the source that ends up in the cropped output.
///
/// Maps the cover crop of `fit` back through the cover scale, giving
/// `(left, top, width, height)` in source pixels. Cropping this region and
/// resizing it straight to `target` yields the same framing as resizing to the
/// full cover size first, without ever materializing the cover image. Width
/// and height are at least one pixel and the region always lies inside the
/// source.
///
/// # Examples
/// ```
/// # use batch_resize::imaging::{compute_cover_fit, source_crop_rect};
/// let fit = compute_cover_fit((200, 100), (100, 100)).unwrap();
/// assert_eq!(source_crop_rect((200, 100), &fit, (100, 100)), (50, 0, 100, 100));
/// ```
pub fn source_crop_rect(
    source: (u32, u32),
    fit: &CoverFit,
    target: (u32, u32),
) -> (u32, u32, u32, u32) {
    let (left, width) = map_axis(source.0, fit.cover_width, fit.crop_left, target.0);
    let (top, height) = map_axis(source.1, fit.cover_height, fit.crop_top, target.1);
    (left, top, width, height)
}

fn map_axis(src: u32, cover: u32, offset: u32, span: u32) -> (u32, u32) {
    if src == 0 || cover == 0 {
        return (0, 0);
    }
    let scale = src as f64 / cover as f64;
    let len = ((span as f64 * scale).round() as u32).clamp(1, src);
    let start = ((offset as f64 * scale).floor() as u32).min(src - len);
    (start, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // compute_aspect_fit tests
    // =========================================================================

    #[test]
    fn aspect_fit_landscape_into_square() {
        assert_eq!(compute_aspect_fit((800, 600), (400, 400)).unwrap(), (400, 300));
    }

    #[test]
    fn aspect_fit_portrait_into_square() {
        assert_eq!(compute_aspect_fit((600, 800), (400, 400)).unwrap(), (300, 400));
    }

    #[test]
    fn aspect_fit_scales_small_source_up() {
        assert_eq!(compute_aspect_fit((100, 50), (400, 400)).unwrap(), (400, 200));
    }

    #[test]
    fn aspect_fit_square_into_landscape_box() {
        // Height binds: 100x100 inside 200x100
        assert_eq!(compute_aspect_fit((1000, 1000), (200, 100)).unwrap(), (100, 100));
    }

    #[test]
    fn aspect_fit_same_ratio_is_exact() {
        assert_eq!(compute_aspect_fit((1920, 1080), (1280, 720)).unwrap(), (1280, 720));
    }

    #[test]
    fn aspect_fit_extreme_ratio_keeps_one_pixel() {
        assert_eq!(compute_aspect_fit((10_000, 1), (100, 100)).unwrap(), (100, 1));
    }

    #[test]
    fn aspect_fit_handles_full_u32_range() {
        assert_eq!(
            compute_aspect_fit((u32::MAX, u32::MAX - 1), (u32::MAX, u32::MAX)).unwrap(),
            (u32::MAX, u32::MAX - 1)
        );
        assert_eq!(
            compute_aspect_fit((1, u32::MAX), (u32::MAX, u32::MAX)).unwrap(),
            (1, u32::MAX)
        );
    }

    #[test]
    fn round_div_rounds_half_up() {
        assert_eq!(round_div(5, 2), 3);
        assert_eq!(round_div(4, 3), 1);
        assert_eq!(round_div(5, 3), 2);
        assert_eq!(round_div(u64::MAX, 1), u64::MAX);
        assert_eq!(round_div(u64::MAX, 2), 1 << 63);
    }

    #[test]
    fn aspect_fit_rejects_zero_dimensions() {
        assert_eq!(
            compute_aspect_fit((0, 10), (100, 100)),
            Err(InvalidDimension {
                width: 0,
                height: 10
            })
        );
        assert!(compute_aspect_fit((10, 10), (100, 0)).is_err());
    }

    // =========================================================================
    // compute_cover_fit tests
    // =========================================================================

    #[test]
    fn cover_wider_source_holds_height() {
        let fit = compute_cover_fit((200, 100), (100, 100)).unwrap();
        assert_eq!(fit.cover_width, 200);
        assert_eq!(fit.cover_height, 100);
        assert_eq!(fit.crop_left, 50);
        assert_eq!(fit.crop_top, 0);
    }

    #[test]
    fn cover_taller_source_holds_width() {
        // 600x800 into 500x400: width 500, height 500 / 0.75 = 666.67 → 666
        let fit = compute_cover_fit((600, 800), (500, 400)).unwrap();
        assert_eq!((fit.cover_width, fit.cover_height), (500, 666));
        assert_eq!((fit.crop_left, fit.crop_top), (0, 133));
    }

    #[test]
    fn cover_truncates_grown_edge() {
        // 800x600 into 400x500: height 500, width 500 * 4/3 = 666.67 → 666
        let fit = compute_cover_fit((800, 600), (400, 500)).unwrap();
        assert_eq!((fit.cover_width, fit.cover_height), (666, 500));
        assert_eq!(fit.crop_left, 133);
    }

    #[test]
    fn cover_equal_ratio_holds_width() {
        let fit = compute_cover_fit((800, 600), (400, 300)).unwrap();
        assert_eq!(
            fit,
            CoverFit {
                cover_width: 400,
                cover_height: 300,
                crop_left: 0,
                crop_top: 0
            }
        );
    }

    #[test]
    fn cover_odd_overflow_puts_smaller_half_left() {
        // 310x200 into 100x100: cover 155x100, overflow 55 → left 27
        let fit = compute_cover_fit((310, 200), (100, 100)).unwrap();
        assert_eq!(fit.cover_width, 155);
        assert_eq!(fit.crop_left, 27);
    }

    #[test]
    fn cover_upscales_small_source() {
        let fit = compute_cover_fit((50, 50), (100, 200)).unwrap();
        assert_eq!((fit.cover_width, fit.cover_height), (200, 200));
        assert_eq!((fit.crop_left, fit.crop_top), (50, 0));
    }

    #[test]
    fn cover_rejects_zero_dimensions() {
        assert!(compute_cover_fit((100, 0), (10, 10)).is_err());
        assert!(compute_cover_fit((100, 100), (0, 10)).is_err());
    }

    // =========================================================================
    // source_crop_rect tests
    // =========================================================================

    #[test]
    fn source_rect_for_unscaled_cover_is_the_crop() {
        let fit = compute_cover_fit((200, 100), (100, 100)).unwrap();
        assert_eq!(source_crop_rect((200, 100), &fit, (100, 100)), (50, 0, 100, 100));
    }

    #[test]
    fn source_rect_scales_back_through_cover() {
        // 800x600 into 400x500: cover 666x500, crop 133 left
        let fit = compute_cover_fit((800, 600), (400, 500)).unwrap();
        let (left, top, width, height) = source_crop_rect((800, 600), &fit, (400, 500));
        assert_eq!((top, height), (0, 600));
        assert_eq!(left, 159);
        assert_eq!(width, 480);
    }

    #[test]
    fn source_rect_for_extreme_strip_is_tiny() {
        let fit = compute_cover_fit((100_000, 1), (1000, 1000)).unwrap();
        assert_eq!(fit.cover_width, 100_000_000);
        let (left, top, width, height) = source_crop_rect((100_000, 1), &fit, (1000, 1000));
        assert_eq!((width, height), (1, 1));
        assert_eq!(top, 0);
        assert_eq!(left, 49_999);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    proptest! {
        #[test]
        fn aspect_fit_stays_inside_target_and_keeps_ratio(
            sw in 1u32..4000, sh in 1u32..4000, tw in 1u32..4000, th in 1u32..4000
        ) {
            let (w, h) = compute_aspect_fit((sw, sh), (tw, th)).unwrap();
            prop_assert!(w <= tw && h <= th);
            prop_assert!(w == tw || h == th);
            // Cross-multiplied ratio error is bounded by half a pixel on the rounded edge
            let diff = (w as i64 * sh as i64 - h as i64 * sw as i64).abs();
            prop_assert!(diff <= sw.max(sh) as i64);
        }

        #[test]
        fn cover_fit_covers_target_and_crop_is_inside(
            sw in 1u32..4000, sh in 1u32..4000, tw in 1u32..4000, th in 1u32..4000
        ) {
            let fit = compute_cover_fit((sw, sh), (tw, th)).unwrap();
            prop_assert!(fit.cover_width >= tw && fit.cover_height >= th);
            prop_assert!(fit.cover_width == tw || fit.cover_height == th);
            prop_assert!(fit.crop_left + tw <= fit.cover_width);
            prop_assert!(fit.crop_top + th <= fit.cover_height);
        }

        #[test]
        fn aspect_fit_holds_across_full_u32_range(
            sw in 1u32.., sh in 1u32.., tw in 1u32.., th in 1u32..
        ) {
            let (w, h) = compute_aspect_fit((sw, sh), (tw, th)).unwrap();
            prop_assert!(w >= 1 && h >= 1);
            prop_assert!(w <= tw && h <= th);
            prop_assert!(w == tw || h == th);
            let diff = (w as i128 * sh as i128 - h as i128 * sw as i128).abs();
            prop_assert!(diff <= sw.max(sh) as i128);
        }

        #[test]
        fn source_rect_stays_inside_source(
            sw in 1u32..100_000, sh in 1u32..100_000, tw in 1u32..4000, th in 1u32..4000
        ) {
            let fit = compute_cover_fit((sw, sh), (tw, th)).unwrap();
            let (left, top, width, height) = source_crop_rect((sw, sh), &fit, (tw, th));
            prop_assert!(width >= 1 && height >= 1);
            prop_assert!(left + width <= sw);
            prop_assert!(top + height <= sh);
        }

        #[test]
        fn geometry_is_deterministic(
            sw in 1u32..4000, sh in 1u32..4000, tw in 1u32..4000, th in 1u32..4000
        ) {
            prop_assert_eq!(
                compute_aspect_fit((sw, sh), (tw, th)),
                compute_aspect_fit((sw, sh), (tw, th))
            );
            prop_assert_eq!(
                compute_cover_fit((sw, sh), (tw, th)),
                compute_cover_fit((sw, sh), (tw, th))
            );
        }
    }
}
