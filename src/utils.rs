//! Utility functions for coordinate transformations.

pub mod safe_cast;

use nalgebra::Point2;

/// Midpoint of two pixel positions
#[must_use]
pub fn midpoint(a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    nalgebra::center(&a, &b)
}

/// Angle of the directed line `from -> to`, in radians
#[must_use]
pub fn line_angle(from: Point2<f64>, to: Point2<f64>) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Move `point` away from `center` by `factor` (1.0 leaves it in place)
#[must_use]
pub fn scale_about(center: Point2<f64>, point: Point2<f64>, factor: f64) -> Point2<f64> {
    center + (point - center) * factor
}

/// Clamp that tolerates an inverted range
///
/// When `lo > hi` (an accessory wider than the frame) the upper bound wins,
/// so the result is always finite and deterministic.
#[must_use]
pub fn clamp_within(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Keep a draw point inside a `width` × `height` canvas, inset per axis
#[must_use]
pub fn clamp_to_canvas(point: Point2<f64>, width: f64, height: f64, inset_x: f64, inset_y: f64) -> Point2<f64> {
    Point2::new(
        clamp_within(point.x, inset_x, width - inset_x),
        clamp_within(point.y, inset_y, height - inset_y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_midpoint_and_angle() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 10.0);
        assert_eq!(midpoint(a, b), Point2::new(5.0, 5.0));
        assert!((line_angle(a, Point2::new(0.0, 4.0)) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_scale_about() {
        let center = Point2::new(100.0, 100.0);
        let p = scale_about(center, Point2::new(150.0, 100.0), 1.06);
        assert!((p.x - 153.0).abs() < 1e-9);
        assert_eq!(p.y, 100.0);
    }

    #[test]
    fn test_clamp_to_canvas() {
        let p = clamp_to_canvas(Point2::new(-20.0, 900.0), 640.0, 480.0, 10.0, 5.0);
        assert_eq!(p, Point2::new(10.0, 475.0));

        // Inverted range: upper bound wins
        assert_eq!(clamp_within(3.0, 10.0, 2.0), 2.0);
    }
}
