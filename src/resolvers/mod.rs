//! Per-mode geometry resolvers.
//!
//! Each resolver is a pure function from the current detector output to the
//! target poses of its mode's anchors. Resolvers never fail: a missing or
//! corrupted landmark simply leaves the affected anchor hidden.

/// Ring placement on the ring finger of every detected hand
pub mod rings;

/// Sunglasses across the outer eye corners
pub mod sunglasses;

/// Necklace below the jaw line
pub mod necklace;

/// Two independently tracked earrings
pub mod earrings;

use crate::constants::face::{LEFT_EYE_OUTER, RIGHT_EYE_OUTER};
use crate::filters::AnchorId;
use crate::landmarks::{FrameInput, LandmarkFrame, Viewport};
use crate::pose::Pose;
use crate::utils::{line_angle, midpoint};
use crate::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accessory category; exactly one renders per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Rings,
    Sunglasses,
    Earrings,
    Necklace,
}

impl Mode {
    pub const ALL: [Self; 4] = [Self::Rings, Self::Sunglasses, Self::Earrings, Self::Necklace];

    /// Anchors whose smoothing state this mode drives
    #[must_use]
    pub const fn anchors(self) -> &'static [AnchorId] {
        match self {
            Self::Rings => &[AnchorId::RingHand],
            Self::Sunglasses => &[],
            Self::Earrings => &[AnchorId::LeftEar, AnchorId::RightEar],
            Self::Necklace => &[AnchorId::Necklace],
        }
    }

    /// Whether this mode tracks the face rather than hands
    #[must_use]
    pub const fn uses_face(self) -> bool {
        !matches!(self, Self::Rings)
    }

    /// Singular noun used in status messages
    #[must_use]
    pub const fn item_name(self) -> &'static str {
        match self {
            Self::Rings => "ring",
            Self::Sunglasses => "sunglasses",
            Self::Earrings => "earring",
            Self::Necklace => "necklace",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rings => "rings",
            Self::Sunglasses => "sunglasses",
            Self::Earrings => "earrings",
            Self::Necklace => "necklace",
        })
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rings" | "ring" => Ok(Self::Rings),
            "sunglasses" | "glasses" => Ok(Self::Sunglasses),
            "earrings" | "earring" => Ok(Self::Earrings),
            "necklace" | "necklaces" => Ok(Self::Necklace),
            _ => Err(Error::InvalidInput(format!("Unknown mode: {s}"))),
        }
    }
}

/// Everything a resolver may look at for one frame
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub input: &'a FrameInput,
    pub viewport: Viewport,
    /// User size multiplier, 1.0 = 100 %
    pub size_scale: f64,
    /// Width over height of the selected accessory image
    pub asset_aspect: f64,
}

impl ResolveContext<'_> {
    /// Asset aspect ratio, falling back to square for unusable values
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.asset_aspect.is_finite() && self.asset_aspect > 0.0 {
            self.asset_aspect
        } else {
            1.0
        }
    }
}

/// Target pose of one overlay instance; `pose == None` means hidden
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorTarget {
    /// Smoothing anchor, `None` for overlays drawn directly
    pub anchor: Option<AnchorId>,
    pub pose: Option<Pose>,
}

impl AnchorTarget {
    #[must_use]
    pub const fn visible(anchor: Option<AnchorId>, pose: Pose) -> Self {
        Self {
            anchor,
            pose: Some(pose),
        }
    }

    #[must_use]
    pub const fn hidden(anchor: Option<AnchorId>) -> Self {
        Self { anchor, pose: None }
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.pose.is_some()
    }
}

/// Output of a resolver for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub mode: Mode,
    /// Number of hands or faces the detector reported
    pub subject_count: usize,
    /// Targets in draw order; rings may carry several candidates
    pub targets: Vec<AnchorTarget>,
    /// Both ears visible at once
    pub front_view: bool,
}

impl Resolution {
    #[must_use]
    pub const fn empty(mode: Mode, subject_count: usize) -> Self {
        Self {
            mode,
            subject_count,
            targets: Vec::new(),
            front_view: false,
        }
    }

    /// Whether any target is visible this frame
    #[must_use]
    pub fn any_visible(&self) -> bool {
        self.targets.iter().any(AnchorTarget::is_visible)
    }
}

/// Signature shared by every mode resolver
pub type ResolverFn = fn(&ResolveContext<'_>) -> Resolution;

/// Resolver registered for a mode
#[must_use]
pub fn resolver_for(mode: Mode) -> ResolverFn {
    match mode {
        Mode::Rings => rings::resolve,
        Mode::Sunglasses => sunglasses::resolve,
        Mode::Earrings => earrings::resolve,
        Mode::Necklace => necklace::resolve,
    }
}

/// Eye-line measurements shared by the face modes, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    /// Outer corner of the subject's right eye (image left)
    pub right_eye: Point2<f64>,
    /// Outer corner of the subject's left eye (image right)
    pub left_eye: Point2<f64>,
    pub eye_mid: Point2<f64>,
    /// Tilt of the eye line, radians
    pub eye_angle: f64,
    pub eye_distance: f64,
    /// Horizontal face centre in normalized units
    pub center_x_norm: f64,
}

impl FaceMetrics {
    /// Measure the eye line; `None` if either eye corner is unusable
    #[must_use]
    pub fn measure(face: &LandmarkFrame, viewport: Viewport) -> Option<Self> {
        let [right, left] = face.get_all([RIGHT_EYE_OUTER, LEFT_EYE_OUTER])?;
        let right_eye = viewport.to_pixels(right);
        let left_eye = viewport.to_pixels(left);
        Some(Self {
            right_eye,
            left_eye,
            eye_mid: midpoint(right_eye, left_eye),
            eye_angle: line_angle(right_eye, left_eye),
            eye_distance: nalgebra::distance(&right_eye, &left_eye),
            center_x_norm: (right.x + left.x) / 2.0,
        })
    }
}
