//! Pure calculation functions for thumbnail dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::config::ScaleMode;
use crate::types::{Rect, Size};

/// Largest pixel dimension to request from the decoder, in points.
///
/// Returns `None` when no thumbnail size is requested (decode at native
/// resolution).
///
/// - **Fit**: the larger requested dimension, whatever the original's shape.
/// - **Fill**: large enough that, after cropping to the requested aspect
///   ratio, both requested dimensions are still covered. Falls back to the
///   Fit formula when the original size is unknown or has no height.
///
/// # Examples
/// ```
/// # use image_thumbnailer::imaging::max_pixel_dimension;
/// # use image_thumbnailer::{ScaleMode, Size};
/// // 2:1 landscape into a square box needs a 200px long edge
/// let max = max_pixel_dimension(
///     Some(Size::new(400.0, 200.0)),
///     Some(Size::new(100.0, 100.0)),
///     ScaleMode::Fill,
/// );
/// assert_eq!(max, Some(200.0));
/// ```
pub fn max_pixel_dimension(
    original: Option<Size>,
    requested: Option<Size>,
    mode: ScaleMode,
) -> Option<f64> {
    let requested = requested?;

    if mode == ScaleMode::Fill && requested.height > 0.0 {
        if let Some(original) = original.filter(|o| o.height > 0.0) {
            let original_ratio = original.width / original.height;
            let requested_ratio = requested.width / requested.height;

            return Some(if original_ratio < requested_ratio {
                // Original is narrower than the box: width governs
                requested.width / original_ratio.min(1.0)
            } else {
                requested.height * original_ratio.max(1.0)
            });
        }
    }

    Some(requested.width.max(requested.height))
}

/// Displayed size from stored pixel dimensions and whether the orientation
/// turns the image sideways.
pub fn oriented_size(pixel_width: u32, pixel_height: u32, swaps_dimensions: bool) -> Size {
    let size = Size::new(pixel_width as f64, pixel_height as f64);
    if swaps_dimensions {
        size.transposed()
    } else {
        size
    }
}

/// Largest rectangle of `aspect_ratio` fully inside `bounding`, centered.
pub fn fit_rect(aspect_ratio: Size, bounding: Rect, rounds_values: bool) -> Rect {
    make_rect_with_aspect_ratio(aspect_ratio, bounding, ScaleMode::Fit, rounds_values)
}

/// Smallest rectangle of `aspect_ratio` fully covering `bounding`, centered.
pub fn fill_rect(aspect_ratio: Size, bounding: Rect, rounds_values: bool) -> Rect {
    make_rect_with_aspect_ratio(aspect_ratio, bounding, ScaleMode::Fill, rounds_values)
}

/// Center a rectangle with the given aspect ratio on `bounding`.
///
/// One axis always matches `bounding` exactly; the other is shorter (Fit)
/// or longer (Fill). With `rounds_values` the origin and size are rounded
/// to whole units.
pub fn make_rect_with_aspect_ratio(
    aspect_ratio: Size,
    bounding: Rect,
    mode: ScaleMode,
    rounds_values: bool,
) -> Rect {
    let bounding_ratio = bounding.width / bounding.height;
    let content_ratio = aspect_ratio.width / aspect_ratio.height;
    let direction = match mode {
        ScaleMode::Fit => 1.0,
        ScaleMode::Fill => -1.0,
    };

    let mut rect = if (bounding_ratio - content_ratio) * direction > 0.0 {
        // Height matches, width is centered
        let height = bounding.height;
        let width = height * content_ratio;
        Rect::new(
            bounding.x + (bounding.width - width) / 2.0,
            bounding.y,
            width,
            height,
        )
    } else {
        let width = bounding.width;
        let height = width / content_ratio;
        Rect::new(
            bounding.x,
            bounding.y + (bounding.height - height) / 2.0,
            width,
            height,
        )
    };

    if rounds_values {
        rect.x = rect.x.round();
        rect.y = rect.y.round();
        rect.width = rect.width.round();
        rect.height = rect.height.round();
    }
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: f64, h: f64) -> Option<Size> {
        Some(Size::new(w, h))
    }

    // =========================================================================
    // max_pixel_dimension tests
    // =========================================================================

    #[test]
    fn no_requested_size_is_unbounded() {
        assert_eq!(
            max_pixel_dimension(size(400.0, 200.0), None, ScaleMode::Fill),
            None
        );
        assert_eq!(max_pixel_dimension(None, None, ScaleMode::Fit), None);
    }

    #[test]
    fn fit_uses_larger_requested_dimension() {
        assert_eq!(
            max_pixel_dimension(None, size(200.0, 100.0), ScaleMode::Fit),
            Some(200.0)
        );
    }

    #[test]
    fn fit_ignores_original_shape() {
        assert_eq!(
            max_pixel_dimension(size(100.0, 4000.0), size(200.0, 100.0), ScaleMode::Fit),
            Some(200.0)
        );
    }

    #[test]
    fn fill_wide_original_into_square() {
        // ratio 2.0 >= 1.0 → 100 * max(1, 2.0)
        assert_eq!(
            max_pixel_dimension(size(400.0, 200.0), size(100.0, 100.0), ScaleMode::Fill),
            Some(200.0)
        );
    }

    #[test]
    fn fill_tall_original_into_square() {
        // ratio 0.25 < 1.0 → 100 / min(1, 0.25)
        assert_eq!(
            max_pixel_dimension(size(100.0, 400.0), size(100.0, 100.0), ScaleMode::Fill),
            Some(400.0)
        );
    }

    #[test]
    fn fill_same_ratio_uses_height() {
        // 4:3 into 4:3 → 300 * max(1, 1.333) = 400
        let max = max_pixel_dimension(size(800.0, 600.0), size(400.0, 300.0), ScaleMode::Fill)
            .unwrap();
        assert!((max - 400.0).abs() < 1e-9);
    }

    #[test]
    fn fill_narrow_but_landscape_original() {
        // 3:2 original into 2:1 box → width governs, min(1, 1.5) = 1 → 200
        assert_eq!(
            max_pixel_dimension(size(300.0, 200.0), size(200.0, 100.0), ScaleMode::Fill),
            Some(200.0)
        );
    }

    #[test]
    fn fill_unknown_original_falls_back_to_fit() {
        assert_eq!(
            max_pixel_dimension(None, size(120.0, 300.0), ScaleMode::Fill),
            Some(300.0)
        );
    }

    #[test]
    fn fill_zero_height_original_falls_back_to_fit() {
        assert_eq!(
            max_pixel_dimension(size(400.0, 0.0), size(120.0, 300.0), ScaleMode::Fill),
            Some(300.0)
        );
    }

    #[test]
    fn fill_zero_height_request_falls_back_to_fit() {
        assert_eq!(
            max_pixel_dimension(size(400.0, 200.0), size(120.0, 0.0), ScaleMode::Fill),
            Some(120.0)
        );
    }

    // =========================================================================
    // oriented_size tests
    // =========================================================================

    #[test]
    fn oriented_size_keeps_upright() {
        assert_eq!(oriented_size(640, 480, false), Size::new(640.0, 480.0));
    }

    #[test]
    fn oriented_size_swaps_sideways() {
        assert_eq!(oriented_size(640, 480, true), Size::new(480.0, 640.0));
    }

    // =========================================================================
    // make_rect_with_aspect_ratio tests
    // =========================================================================

    #[test]
    fn fit_wide_content_in_square() {
        let rect = fit_rect(
            Size::new(2.0, 1.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            true,
        );
        assert_eq!(rect, Rect::new(0.0, 25.0, 100.0, 50.0));
    }

    #[test]
    fn fill_wide_content_in_square() {
        let rect = fill_rect(
            Size::new(2.0, 1.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            true,
        );
        assert_eq!(rect, Rect::new(-50.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn fit_tall_content_respects_origin() {
        let rect = fit_rect(
            Size::new(1.0, 2.0),
            Rect::new(10.0, 20.0, 100.0, 100.0),
            true,
        );
        assert_eq!(rect, Rect::new(35.0, 20.0, 50.0, 100.0));
    }

    #[test]
    fn unrounded_values_are_kept() {
        let rect = fit_rect(
            Size::new(3.0, 1.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            false,
        );
        assert!((rect.height - 100.0 / 3.0).abs() < 1e-9);
        assert!((rect.y - (100.0 - 100.0 / 3.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn rounding_applies_to_every_field() {
        let rect = fill_rect(
            Size::new(3.0, 1.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            true,
        );
        assert_eq!(rect, Rect::new(-100.0, 0.0, 300.0, 100.0));
        let rect = fit_rect(
            Size::new(3.0, 1.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            true,
        );
        assert_eq!(rect, Rect::new(0.0, 33.0, 100.0, 33.0));
    }

    #[test]
    fn same_ratio_matches_bounding() {
        let bounding = Rect::new(5.0, 5.0, 40.0, 30.0);
        assert_eq!(fit_rect(Size::new(4.0, 3.0), bounding, true), bounding);
        assert_eq!(fill_rect(Size::new(4.0, 3.0), bounding, true), bounding);
    }
}
