//! Property and behaviour tests for anchor smoothing

use accessory_overlay::filters::{
    smooth_angle, smooth_value, wrap_angle, AnchorId, AnchorProfile, LossPolicy, SmoothingFilter,
};
use accessory_overlay::pose::Pose;
use proptest::prelude::*;
use std::f64::consts::PI;

proptest! {
    #[test]
    fn prop_linear_smoothing_stays_between_prev_and_target(
        prev in -1.0e6..1.0e6f64,
        target in -1.0e6..1.0e6f64,
        alpha in 0.001..=1.0f64
    ) {
        let next = smooth_value(Some(prev), target, alpha);
        let tolerance = 1e-9 * (1.0 + prev.abs().max(target.abs()));
        prop_assert!(next >= prev.min(target) - tolerance);
        prop_assert!(next <= prev.max(target) + tolerance);
        // Never overshoots the step size
        prop_assert!((next - prev).abs() <= (target - prev).abs() + tolerance);
    }

    #[test]
    fn prop_absent_previous_snaps_to_target(target in -1.0e6..1.0e6f64, alpha in 0.001..=1.0f64) {
        prop_assert_eq!(smooth_value(None, target, alpha), target);
        prop_assert_eq!(smooth_angle(None, target, alpha), target);
    }

    #[test]
    fn prop_wrap_angle_range(diff in -1000.0..1000.0f64) {
        let wrapped = wrap_angle(diff);
        prop_assert!((-PI..=PI).contains(&wrapped));
        // Same direction modulo a full turn
        prop_assert!((wrapped - diff).sin().abs() < 1e-6);
    }

    #[test]
    fn prop_circular_smoothing_takes_short_arc(
        prev in -PI..PI,
        target in -PI..PI,
        alpha in 0.001..=1.0f64
    ) {
        let next = smooth_angle(Some(prev), target, alpha);
        let step = next - prev;
        // A step never exceeds alpha times half a turn
        prop_assert!(step.abs() <= alpha * PI + 1e-9);
        // And it heads toward the target along the shorter way
        let remaining = wrap_angle(target - prev);
        prop_assert!(step * remaining >= -1e-12);
    }
}

#[test]
fn test_circular_smoothing_crosses_boundary() {
    let next = smooth_angle(Some(3.0), -3.0, 0.5);
    // Half of the 0.283 rad short arc, past +π
    assert!((next - (3.0 + (2.0 * PI - 6.0) / 2.0)).abs() < 1e-9);
    assert!((next.abs() - PI).abs() < 0.01);
}

#[test]
fn test_ring_resets_then_snaps() {
    let mut filter = SmoothingFilter::default();
    filter.update(AnchorId::RingHand, Pose::new(100.0, 100.0, 0.0, 10.0));
    let smoothed = filter.update(AnchorId::RingHand, Pose::new(200.0, 100.0, 0.0, 20.0));
    assert!((smoothed.x - 130.0).abs() < 1e-9);
    assert!((smoothed.scale - 13.0).abs() < 1e-9);

    filter.mark_lost(AnchorId::RingHand);
    let state = filter.state(AnchorId::RingHand);
    assert_eq!((state.x, state.y, state.angle, state.scale), (None, None, None, None));

    let fresh = Pose::new(400.0, 300.0, 1.0, 8.0);
    assert_eq!(filter.update(AnchorId::RingHand, fresh), fresh);
}

#[test]
fn test_ear_holds_then_snaps_on_reacquire() {
    let mut filter = SmoothingFilter::default();
    let first = Pose::new(100.0, 200.0, 0.1, 40.0);
    assert_eq!(filter.update(AnchorId::LeftEar, first), first);

    let second = filter.update(AnchorId::LeftEar, Pose::new(110.0, 200.0, 0.1, 42.0));
    assert!((second.x - (100.0 + 0.28 * 10.0)).abs() < 1e-9);
    // Scale is not smoothed for ears
    assert_eq!(second.scale, 42.0);

    for _ in 0..5 {
        filter.mark_lost(AnchorId::LeftEar);
    }
    // Values are held while hidden
    assert_eq!(filter.state(AnchorId::LeftEar).x, Some(second.x));

    let fresh = Pose::new(300.0, 250.0, -0.2, 44.0);
    assert_eq!(filter.update(AnchorId::LeftEar, fresh), fresh);

    let after = filter.update(AnchorId::LeftEar, Pose::new(310.0, 250.0, -0.2, 44.0));
    assert!((after.x - (300.0 + 0.28 * 10.0)).abs() < 1e-9);
}

#[test]
fn test_necklace_angle_uses_its_own_alpha() {
    let mut filter = SmoothingFilter::default();
    filter.update(AnchorId::Necklace, Pose::new(0.0, 0.0, 0.0, 100.0));
    let next = filter.update(AnchorId::Necklace, Pose::new(0.0, 0.0, 1.0, 100.0));
    assert!((next.angle - 0.12).abs() < 1e-12);
}

#[test]
fn test_anchors_are_independent() {
    let mut filter = SmoothingFilter::default();
    filter.update(AnchorId::LeftEar, Pose::new(1.0, 1.0, 0.0, 1.0));
    filter.update(AnchorId::RightEar, Pose::new(9.0, 9.0, 0.0, 1.0));
    filter.mark_lost(AnchorId::RightEar);

    assert!(filter.state(AnchorId::LeftEar).previously_visible);
    assert!(!filter.state(AnchorId::RightEar).previously_visible);
    assert!(filter.state(AnchorId::Necklace).is_cleared());
}

#[test]
fn test_custom_profile_policy() {
    let mut profiles = std::collections::HashMap::new();
    profiles.insert(
        AnchorId::Necklace,
        AnchorProfile {
            position_alpha: 1.0,
            angle_alpha: 1.0,
            scale_alpha: None,
            on_loss: LossPolicy::Reset,
        },
    );
    let mut filter = SmoothingFilter::new(profiles);
    assert_eq!(filter.profile(AnchorId::Necklace).on_loss, LossPolicy::Reset);
    assert_eq!(filter.profile(AnchorId::LeftEar).on_loss, LossPolicy::HoldAndSnap);

    filter.update(AnchorId::Necklace, Pose::new(5.0, 5.0, 0.0, 50.0));
    filter.mark_lost(AnchorId::Necklace);
    assert!(filter.state(AnchorId::Necklace).is_cleared());
}
