use super::{AnchorTarget, FaceMetrics, Mode, ResolveContext, Resolution};
use crate::constants::face::{CHIN, LEFT_TRAGUS, NECK_BASE, RIGHT_TRAGUS};
use crate::constants::{
    NECKLACE_CHIN_BLEND, NECKLACE_DROP_FACTOR, NECKLACE_EYE_WIDTH_FACTOR, NECKLACE_FACE_HEIGHT_FACTOR,
    NECKLACE_SIDES_WEIGHT,
};
use crate::filters::AnchorId;
use crate::landmarks::LandmarkFrame;
use crate::pose::Pose;
use crate::utils::{line_angle, midpoint};
use nalgebra::Point2;

fn necklace_target(face: &LandmarkFrame, ctx: &ResolveContext<'_>) -> Option<Pose> {
    let metrics = FaceMetrics::measure(face, ctx.viewport)?;
    let [chin, left_side, right_side, base] = face
        .get_all([CHIN, LEFT_TRAGUS, RIGHT_TRAGUS, NECK_BASE])?
        .map(|p| ctx.viewport.to_pixels(p));

    let face_height = nalgebra::distance(&metrics.eye_mid, &chin);
    let width = (metrics.eye_distance * NECKLACE_EYE_WIDTH_FACTOR).max(face_height * NECKLACE_FACE_HEIGHT_FACTOR)
        * ctx.size_scale;
    let height = width / ctx.aspect();

    // Horizontal: mostly the neck sides; vertical: just above the neck base
    let sides_mid = midpoint(left_side, right_side);
    let x = sides_mid.x * NECKLACE_SIDES_WEIGHT + base.x * (1.0 - NECKLACE_SIDES_WEIGHT);
    let y = base.y + (chin.y - base.y) * NECKLACE_CHIN_BLEND + height * NECKLACE_DROP_FACTOR;

    Some(Pose::at(Point2::new(x, y), line_angle(left_side, right_side), width))
}

/// Necklace hanging below the jaw, smoothed as a single anchor
pub fn resolve(ctx: &ResolveContext<'_>) -> Resolution {
    let Some(face) = ctx.input.face.as_ref() else {
        return Resolution::empty(Mode::Necklace, 0);
    };

    let anchor = Some(AnchorId::Necklace);
    let target = necklace_target(face, ctx).map_or(AnchorTarget::hidden(anchor), |pose| {
        AnchorTarget::visible(anchor, pose)
    });

    Resolution {
        targets: vec![target],
        ..Resolution::empty(Mode::Necklace, 1)
    }
}
