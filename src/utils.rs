//! Utility functions for coordinate remapping and region geometry.

pub mod encoding;
pub mod safe_cast;

use opencv::core::{Rect, Scalar};

/// Build an `OpenCV` color from a BGR tuple constant.
#[must_use]
pub fn bgr((b, g, r): (f64, f64, f64)) -> Scalar {
    Scalar::new(b, g, r, 0.0)
}

/// Linearly remap `value` from the `src` interval to the `dst` interval.
///
/// Values outside the source interval clamp to the destination endpoints,
/// so the active control rectangle maps onto the full screen and fingertip
/// positions in the margin pin to the screen edge.
#[must_use]
pub fn interp(value: f64, src: (f64, f64), dst: (f64, f64)) -> f64 {
    let (s0, s1) = src;
    let (d0, d1) = dst;
    if s1 <= s0 || value <= s0 {
        return d0;
    }
    if value >= s1 {
        return d1;
    }
    d0 + (value - s0) / (s1 - s0) * (d1 - d0)
}

/// Expand a detection box by `shift` of its size, square it, and clamp it
/// to the image bounds. Used to turn a palm box into a landmark crop.
#[must_use]
#[allow(clippy::cast_precision_loss)] // box dimensions are small
#[allow(clippy::cast_possible_truncation)]
pub fn square_region(mut bbox: Rect, max_width: i32, max_height: i32, shift: f32) -> Rect {
    let x_shift = (bbox.width as f32 * shift) as i32;
    let y_shift = (bbox.height as f32 * shift) as i32;

    bbox.x = (bbox.x - x_shift).max(0);
    bbox.y = (bbox.y - y_shift).max(0);
    bbox.width = (bbox.width + 2 * x_shift).min(max_width - bbox.x);
    bbox.height = (bbox.height + 2 * y_shift).min(max_height - bbox.y);

    let side = bbox.width.max(bbox.height).min(max_width).min(max_height);
    bbox.width = side;
    bbox.height = side;

    if bbox.x + bbox.width > max_width {
        bbox.x = max_width - bbox.width;
    }
    if bbox.y + bbox.height > max_height {
        bbox.y = max_height - bbox.height;
    }

    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_interp_midpoint() {
        // Fingertip at the frame center with a 150 px margin on 640x480
        assert!((interp(320.0, (150.0, 490.0), (0.0, 1920.0)) - 960.0).abs() < 1e-9);
        assert!((interp(240.0, (150.0, 330.0), (0.0, 1080.0)) - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_interp_clamps_outside_source_range() {
        assert_eq!(interp(10.0, (150.0, 490.0), (0.0, 1920.0)), 0.0);
        assert_eq!(interp(630.0, (150.0, 490.0), (0.0, 1920.0)), 1920.0);
        assert_eq!(interp(150.0, (150.0, 490.0), (0.0, 1920.0)), 0.0);
        assert_eq!(interp(490.0, (150.0, 490.0), (0.0, 1920.0)), 1920.0);
    }

    #[test]
    fn test_interp_degenerate_source_range() {
        // Margin larger than half the frame collapses the active rectangle
        assert_eq!(interp(320.0, (400.0, 240.0), (0.0, 1920.0)), 0.0);
    }

    #[test]
    fn test_square_region_is_square_and_clamped() {
        let region = square_region(Rect::new(500, 300, 200, 150), 640, 480, 0.3);
        assert_eq!(region.width, region.height);
        assert!(region.x >= 0 && region.y >= 0);
        assert!(region.x + region.width <= 640);
        assert!(region.y + region.height <= 480);
    }

    #[test]
    fn test_square_region_expands() {
        let region = square_region(Rect::new(100, 100, 100, 100), 640, 480, 0.3);
        assert!(region.width > 100);
        assert!(region.x < 100);
    }

    proptest! {
        #[test]
        fn prop_interp_stays_in_destination(value in -1000.0f64..2000.0) {
            let mapped = interp(value, (150.0, 490.0), (0.0, 1920.0));
            prop_assert!((0.0..=1920.0).contains(&mapped));
        }

        #[test]
        fn prop_square_region_stays_in_bounds(
            x in 0..600i32,
            y in 0..440i32,
            w in 1..200i32,
            h in 1..200i32,
        ) {
            let region = square_region(Rect::new(x, y, w, h), 640, 480, 0.3);
            prop_assert!(region.x >= 0);
            prop_assert!(region.y >= 0);
            prop_assert!(region.x + region.width <= 640);
            prop_assert!(region.y + region.height <= 480);
            prop_assert_eq!(region.width, region.height);
        }
    }
}
