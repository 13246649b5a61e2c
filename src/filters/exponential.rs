//! Exponential smoothing primitives for linear and circular quantities.

use std::f64::consts::{PI, TAU};

/// Wrap an angle difference into `[-π, π]`
///
/// Uses the Euclidean remainder so that large negative differences wrap the
/// same way as positive ones.
#[must_use]
pub fn wrap_angle(diff: f64) -> f64 {
    (diff + PI).rem_euclid(TAU) - PI
}

/// Linear exponential smoothing; an absent previous value snaps to the target
#[must_use]
pub fn smooth_value(prev: Option<f64>, target: f64, alpha: f64) -> f64 {
    match prev {
        Some(prev) => alpha.mul_add(target - prev, prev),
        None => target,
    }
}

/// Circular exponential smoothing along the short arc
///
/// The result is not renormalized, so it may leave `[-π, π]` after crossing
/// the boundary; callers only use it as a rotation.
#[must_use]
pub fn smooth_angle(prev: Option<f64>, target: f64, alpha: f64) -> f64 {
    match prev {
        Some(prev) => alpha.mul_add(wrap_angle(target - prev), prev),
        None => target,
    }
}
