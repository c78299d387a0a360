//! Rounded rectangle path construction.

use tiny_skia::{Path, PathBuilder, Rect};

/// Cubic bezier control distance approximating a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// The radius actually used for a `width x height` rectangle: `max(0, min(radius, min(w, h) / 2))`.
///
/// Keeps opposite corner arcs from overlapping.
pub fn effective_radius(width: f32, height: f32, radius: f32) -> f32 {
    radius.min(width.min(height) / 2.0).max(0.0)
}

/// Builds a closed rectangle path with four quarter-arc corners.
///
/// Returns `None` if the rectangle has no area.
pub fn rounded_rect(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    let r = effective_radius(width, height, radius);
    if r == 0.0 {
        return Some(PathBuilder::from_rect(Rect::from_xywh(x, y, width, height)?));
    }
    let k = r * KAPPA;
    let (right, bottom) = (x + width, y + height);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_radius_clamps() {
        assert_relative_eq!(effective_radius(142.0, 142.0, 11.0), 11.0);
        assert_relative_eq!(effective_radius(40.0, 20.0, 500.0), 10.0);
        assert_relative_eq!(effective_radius(40.0, 20.0, -3.0), 0.0);
    }

    #[test]
    fn test_oversized_radius_stays_in_bounds() {
        let path = rounded_rect(10.0, 20.0, 40.0, 20.0, 500.0).unwrap();
        let bounds = path.bounds();
        assert_relative_eq!(bounds.left(), 10.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.top(), 20.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.right(), 50.0, epsilon = 1e-3);
        assert_relative_eq!(bounds.bottom(), 40.0, epsilon = 1e-3);
    }

    #[test]
    fn test_sharp_rect_when_radius_zero() {
        let path = rounded_rect(0.0, 0.0, 8.0, 8.0, 0.0).unwrap();
        // move + 3 lines + close
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_degenerate_rect_has_no_path() {
        assert!(rounded_rect(0.0, 0.0, 0.0, 10.0, 2.0).is_none());
        assert!(rounded_rect(0.0, 0.0, 10.0, -1.0, 2.0).is_none());
    }
}
