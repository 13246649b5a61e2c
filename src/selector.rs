//! Candidate selection when several hands could carry the ring.

use crate::pose::Pose;
use nalgebra::Point2;

/// Pick the ring candidate to track this frame
///
/// With a previous smoothed anchor the nearest raw candidate wins, keeping
/// the ring on the same hand. On a cold start the largest ring radius wins,
/// which favours the hand closest to the camera. Ties keep the earlier
/// candidate.
#[must_use]
pub fn select_candidate(candidates: &[Pose], previous: Option<Point2<f64>>) -> Option<Pose> {
    let mut best: Option<(Pose, f64)> = None;
    for candidate in candidates {
        // Lower key is better
        let key = match previous {
            Some(prev) => candidate.distance_to(prev),
            None => -candidate.scale,
        };
        if best.map_or(true, |(_, best_key)| key < best_key) {
            best = Some((*candidate, key));
        }
    }
    best.map(|(pose, _)| pose)
}
