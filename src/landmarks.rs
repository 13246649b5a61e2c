//! Landmark frames delivered by the external hand/face detector.
//!
//! Points are normalized to `[0, 1]` on both axes and addressed by the
//! detector's fixed index scheme (see [`crate::constants`]). Frames are
//! consumed read-only; lookups never panic on short or corrupted frames.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A single normalized keypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0.0 = left edge, 1.0 = right edge
    pub x: f64,
    /// Vertical position, 0.0 = top edge, 1.0 = bottom edge
    pub y: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Whether the point lies strictly inside `(min, max)` on both axes
    #[must_use]
    pub fn within(&self, min: f64, max: f64) -> bool {
        self.x > min && self.x < max && self.y > min && self.y < max
    }
}

/// Ordered landmarks for one tracked hand or face
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Look up a landmark, treating absent and non-finite points alike
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied().filter(Landmark::is_finite)
    }

    /// Look up several landmarks at once; `None` if any is unusable
    #[must_use]
    pub fn get_all<const N: usize>(&self, indices: [usize; N]) -> Option<[Landmark; N]> {
        let mut out = [Landmark::new(0.0, 0.0); N];
        for (slot, index) in out.iter_mut().zip(indices) {
            *slot = self.get(index)?;
        }
        Some(out)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<(f64, f64)>> for LandmarkFrame {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(|(x, y)| Landmark::new(x, y)).collect())
    }
}

/// Detector output for one video frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// Zero or more detected hands
    pub hands: Vec<LandmarkFrame>,
    /// At most one detected face
    pub face: Option<LandmarkFrame>,
}

impl FrameInput {
    /// Parse one JSON line of recorded detector output
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not a valid frame record
    pub fn from_json_line(line: &str) -> crate::Result<Self> {
        serde_json::from_str(line).map_err(|e| crate::Error::FrameInput(e.to_string()))
    }
}

/// Pixel geometry of the video frame the overlay is drawn for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Frame width in logical pixels
    pub width: f64,
    /// Frame height in logical pixels
    pub height: f64,
    /// Device pixel ratio reported by the display
    pub pixel_ratio: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Integer backing-store ratio, never below 1
    #[must_use]
    pub fn device_ratio(&self) -> f64 {
        if self.pixel_ratio.is_finite() {
            self.pixel_ratio.floor().max(1.0)
        } else {
            1.0
        }
    }

    /// Map a normalized landmark to logical pixel coordinates
    #[must_use]
    pub fn to_pixels(&self, landmark: Landmark) -> Point2<f64> {
        Point2::new(landmark.x * self.width, landmark.y * self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}
