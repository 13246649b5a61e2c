//! Per-anchor smoothing state with reset/snap semantics.

use super::exponential::{smooth_angle, smooth_value};
use crate::constants::{EAR_ANGLE_ALPHA, EAR_POSITION_ALPHA, NECKLACE_ALPHA, RING_ALPHA};
use crate::pose::Pose;
use log::debug;
use nalgebra::Point2;
use std::collections::HashMap;
use std::fmt;

/// Identity of an independently tracked overlay anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorId {
    /// The single ring shared by all detected hands
    RingHand,
    LeftEar,
    RightEar,
    Necklace,
}

impl AnchorId {
    pub const ALL: [Self; 4] = [Self::RingHand, Self::LeftEar, Self::RightEar, Self::Necklace];
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RingHand => "ringHand",
            Self::LeftEar => "leftEar",
            Self::RightEar => "rightEar",
            Self::Necklace => "necklace",
        })
    }
}

/// What happens to an anchor's state when it stops being visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossPolicy {
    /// Forget everything; reappearance starts from the fresh target
    Reset,
    /// Keep the last smoothed values, but snap on the first visible frame
    HoldAndSnap,
}

/// Smoothing parameters for one anchor category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorProfile {
    pub position_alpha: f64,
    pub angle_alpha: f64,
    /// `None` passes the target scale through unsmoothed
    pub scale_alpha: Option<f64>,
    pub on_loss: LossPolicy,
}

impl AnchorProfile {
    /// Default profile for an anchor
    #[must_use]
    pub const fn default_for(anchor: AnchorId) -> Self {
        match anchor {
            AnchorId::RingHand => Self {
                position_alpha: RING_ALPHA,
                angle_alpha: RING_ALPHA,
                scale_alpha: Some(RING_ALPHA),
                on_loss: LossPolicy::Reset,
            },
            AnchorId::LeftEar | AnchorId::RightEar => Self {
                position_alpha: EAR_POSITION_ALPHA,
                angle_alpha: EAR_ANGLE_ALPHA,
                scale_alpha: None,
                on_loss: LossPolicy::HoldAndSnap,
            },
            AnchorId::Necklace => Self {
                position_alpha: NECKLACE_ALPHA,
                angle_alpha: NECKLACE_ALPHA,
                scale_alpha: None,
                on_loss: LossPolicy::HoldAndSnap,
            },
        }
    }
}

/// Smoothed values carried across frames for one anchor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothingState {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub angle: Option<f64>,
    pub scale: Option<f64>,
    pub previously_visible: bool,
}

impl SmoothingState {
    /// Whether every smoothed field is absent
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.angle.is_none() && self.scale.is_none()
    }

    /// The stored pose, if every field has a value
    #[must_use]
    pub fn pose(&self) -> Option<Pose> {
        Some(Pose::new(self.x?, self.y?, self.angle?, self.scale?))
    }

    /// The stored position, if any
    #[must_use]
    pub fn position(&self) -> Option<Point2<f64>> {
        Some(Point2::new(self.x?, self.y?))
    }
}

/// Owner of every anchor's smoothing state
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    profiles: HashMap<AnchorId, AnchorProfile>,
    states: HashMap<AnchorId, SmoothingState>,
}

impl SmoothingFilter {
    /// Create a filter with explicit per-anchor profiles
    ///
    /// Anchors missing from `profiles` use [`AnchorProfile::default_for`].
    #[must_use]
    pub fn new(profiles: HashMap<AnchorId, AnchorProfile>) -> Self {
        let profiles = AnchorId::ALL
            .into_iter()
            .map(|anchor| {
                let profile = profiles
                    .get(&anchor)
                    .copied()
                    .unwrap_or_else(|| AnchorProfile::default_for(anchor));
                (anchor, profile)
            })
            .collect();
        Self {
            profiles,
            states: HashMap::new(),
        }
    }

    #[must_use]
    pub fn profile(&self, anchor: AnchorId) -> AnchorProfile {
        self.profiles
            .get(&anchor)
            .copied()
            .unwrap_or_else(|| AnchorProfile::default_for(anchor))
    }

    /// Current state of an anchor; untouched anchors read as cleared
    #[must_use]
    pub fn state(&self, anchor: AnchorId) -> SmoothingState {
        self.states.get(&anchor).copied().unwrap_or_default()
    }

    /// Feed the target of a visible anchor and return the smoothed pose
    pub fn update(&mut self, anchor: AnchorId, target: Pose) -> Pose {
        let profile = self.profile(anchor);
        let state = self.states.entry(anchor).or_default();

        let snap = !state.previously_visible && profile.on_loss == LossPolicy::HoldAndSnap;
        if snap {
            debug!("{anchor}: reacquired, snapping to target");
            state.x = Some(target.x);
            state.y = Some(target.y);
            state.angle = Some(target.angle);
            state.scale = Some(target.scale);
        } else {
            state.x = Some(smooth_value(state.x, target.x, profile.position_alpha));
            state.y = Some(smooth_value(state.y, target.y, profile.position_alpha));
            state.angle = Some(smooth_angle(state.angle, target.angle, profile.angle_alpha));
            state.scale = Some(match profile.scale_alpha {
                Some(alpha) => smooth_value(state.scale, target.scale, alpha),
                None => target.scale,
            });
        }
        state.previously_visible = true;

        state.pose().unwrap_or(target)
    }

    /// Record that an anchor is not visible this frame
    pub fn mark_lost(&mut self, anchor: AnchorId) {
        match self.profile(anchor).on_loss {
            LossPolicy::Reset => {
                if let Some(state) = self.states.get_mut(&anchor) {
                    if !state.is_cleared() {
                        debug!("{anchor}: tracking lost, clearing state");
                    }
                    *state = SmoothingState::default();
                }
            }
            LossPolicy::HoldAndSnap => {
                if let Some(state) = self.states.get_mut(&anchor) {
                    state.previously_visible = false;
                }
            }
        }
    }

    /// Forget every anchor
    pub fn reset(&mut self) {
        self.states.clear();
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}
