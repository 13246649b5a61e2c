//! Per-frame overlay pose.

use nalgebra::Point2;

/// Target or smoothed placement of one overlay instance
///
/// `scale` is mode specific: ring radius, sunglasses/necklace width or
/// earring size, always in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Rotation in radians
    pub angle: f64,
    pub scale: f64,
}

impl Pose {
    #[must_use]
    pub const fn new(x: f64, y: f64, angle: f64, scale: f64) -> Self {
        Self { x, y, angle, scale }
    }

    #[must_use]
    pub fn at(position: Point2<f64>, angle: f64, scale: f64) -> Self {
        Self::new(position.x, position.y, angle, scale)
    }

    #[must_use]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Euclidean distance between the two pose centres
    #[must_use]
    pub fn distance_to(&self, other: Point2<f64>) -> f64 {
        nalgebra::distance(&self.position(), &other)
    }
}
