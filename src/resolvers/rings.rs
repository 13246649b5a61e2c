use super::{AnchorTarget, Mode, ResolveContext, Resolution};
use crate::constants::hand::{RING_FINGER_MCP, RING_FINGER_PIP};
use crate::constants::{RING_ANCHOR_LERP, RING_RADIUS_FACTOR, RING_RADIUS_MAX, RING_RADIUS_MIN};
use crate::filters::AnchorId;
use crate::landmarks::{LandmarkFrame, Viewport};
use crate::pose::Pose;

/// Ring target for one hand, or `None` if the ring finger is not usable
///
/// The ring sits 55 % of the way from the base joint to the middle joint,
/// aligned with the finger; its radius follows the segment length.
#[must_use]
pub fn ring_candidate(hand: &LandmarkFrame, viewport: Viewport) -> Option<Pose> {
    let [mcp, pip] = hand.get_all([RING_FINGER_MCP, RING_FINGER_PIP])?;
    let base = viewport.to_pixels(mcp);
    let segment = viewport.to_pixels(pip) - base;

    let center = base + segment * RING_ANCHOR_LERP;
    let angle = segment.y.atan2(segment.x);
    let radius = (segment.norm() * RING_RADIUS_FACTOR).clamp(RING_RADIUS_MIN, RING_RADIUS_MAX);

    Some(Pose::at(center, angle, radius))
}

/// One ring candidate per usable hand
pub fn resolve(ctx: &ResolveContext<'_>) -> Resolution {
    let hands = &ctx.input.hands;
    let targets = hands
        .iter()
        .filter_map(|hand| ring_candidate(hand, ctx.viewport))
        .map(|pose| AnchorTarget::visible(Some(AnchorId::RingHand), pose))
        .collect();

    Resolution {
        targets,
        ..Resolution::empty(Mode::Rings, hands.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(mcp: (f64, f64), pip: (f64, f64)) -> LandmarkFrame {
        let mut points = vec![(0.5, 0.5); 21];
        points[RING_FINGER_MCP] = mcp;
        points[RING_FINGER_PIP] = pip;
        LandmarkFrame::from(points)
    }

    #[test]
    fn test_ring_candidate_geometry() {
        let viewport = Viewport::new(1000.0, 1000.0, 1.0);
        let pose = ring_candidate(&hand((0.5, 0.5), (0.5, 0.45)), viewport).unwrap();

        assert!((pose.x - 500.0).abs() < 1e-9);
        assert!((pose.y - 472.5).abs() < 1e-9);
        assert!((pose.angle + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        // 50 px segment * 0.30 = 15 px
        assert!((pose.scale - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_angle_measured_in_pixels_on_wide_frames() {
        let viewport = Viewport::new(1280.0, 720.0, 1.0);
        let pose = ring_candidate(&hand((0.5, 0.5), (0.55, 0.45)), viewport).unwrap();

        // 64 px right and 36 px up, not the 45 degrees of the raw landmarks
        assert!((pose.angle - (-36.0_f64).atan2(64.0)).abs() < 1e-9);
        assert!((pose.angle + std::f64::consts::FRAC_PI_4).abs() > 0.2);
    }

    #[test]
    fn test_ring_radius_clamped() {
        let viewport = Viewport::new(1000.0, 1000.0, 1.0);
        let tiny = ring_candidate(&hand((0.5, 0.5), (0.5, 0.501)), viewport).unwrap();
        let huge = ring_candidate(&hand((0.1, 0.1), (0.9, 0.9)), viewport).unwrap();
        assert_eq!(tiny.scale, RING_RADIUS_MIN);
        assert_eq!(huge.scale, RING_RADIUS_MAX);
    }

    #[test]
    fn test_truncated_hand_has_no_candidate() {
        let short = LandmarkFrame::from(vec![(0.5, 0.5); 10]);
        assert!(ring_candidate(&short, Viewport::default()).is_none());
    }
}
