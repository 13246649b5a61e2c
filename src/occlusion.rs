//! Face-outline clipping so earrings pass behind the face.

use crate::constants::face::FACE_OVAL;
use crate::constants::{OCCLUSION_EXPAND_FRONT, OCCLUSION_EXPAND_PARTIAL};
use crate::landmarks::{LandmarkFrame, Viewport};
use crate::surface::ClipRegion;
use crate::utils::scale_about;
use nalgebra::Point2;

/// Expansion applied to the face outline about the eye-line midpoint
#[must_use]
pub const fn expansion(both_ears_visible: bool) -> f64 {
    if both_ears_visible {
        OCCLUSION_EXPAND_FRONT
    } else {
        OCCLUSION_EXPAND_PARTIAL
    }
}

/// Face outline in logical pixels, pushed outward from `center` by `factor`
///
/// Returns `None` if any outline landmark is missing.
#[must_use]
pub fn face_outline(face: &LandmarkFrame, viewport: Viewport, center: Point2<f64>, factor: f64) -> Option<Vec<Point2<f64>>> {
    FACE_OVAL
        .iter()
        .map(|&index| {
            face.get(index)
                .map(|p| scale_about(center, viewport.to_pixels(p), factor))
        })
        .collect()
}

/// Clip region that paints the whole frame except the (expanded) face
#[must_use]
pub fn face_clip(face: &LandmarkFrame, viewport: Viewport, center: Point2<f64>, both_ears_visible: bool) -> Option<ClipRegion> {
    let outline = face_outline(face, viewport, center, expansion(both_ears_visible))?;
    Some(ClipRegion::excluding(viewport.width, viewport.height, outline))
}
