use super::{AnchorTarget, FaceMetrics, Mode, ResolveContext, Resolution};
use crate::constants::face::{LEFT_TRAGUS, RIGHT_TRAGUS};
use crate::constants::{
    EARRING_DROP_FACTOR, EARRING_OUTWARD_FRONT, EARRING_OUTWARD_SIDE, EARRING_SIZE_FACTOR, EAR_BOUNDS_MAX,
    EAR_BOUNDS_MIN, EAR_MARGIN,
};
use crate::filters::AnchorId;
use crate::landmarks::Landmark;
use crate::pose::Pose;
use nalgebra::Vector2;

/// Which side of the face an ear is on, as seen in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    const fn anchor(self) -> AnchorId {
        match self {
            Self::Left => AnchorId::LeftEar,
            Self::Right => AnchorId::RightEar,
        }
    }

    /// Horizontal direction pointing away from the face centre
    const fn outward(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Whether an ear's tragus is trackable
///
/// The point must sit inside the frame and clearly on its own side of the
/// face centre; a turned head hides the far ear behind the cheek.
#[must_use]
pub fn ear_visible(tragus: Option<Landmark>, side: Side, face_center_x: f64) -> bool {
    let Some(tragus) = tragus else {
        return false;
    };
    if !tragus.within(EAR_BOUNDS_MIN, EAR_BOUNDS_MAX) {
        return false;
    }
    match side {
        Side::Left => tragus.x < face_center_x - EAR_MARGIN,
        Side::Right => tragus.x > face_center_x + EAR_MARGIN,
    }
}

/// Left and right earrings, each visible on its own
pub fn resolve(ctx: &ResolveContext<'_>) -> Resolution {
    let Some(face) = ctx.input.face.as_ref() else {
        return Resolution::empty(Mode::Earrings, 0);
    };

    let hidden = vec![
        AnchorTarget::hidden(Some(Side::Left.anchor())),
        AnchorTarget::hidden(Some(Side::Right.anchor())),
    ];
    let Some(metrics) = FaceMetrics::measure(face, ctx.viewport) else {
        return Resolution {
            targets: hidden,
            ..Resolution::empty(Mode::Earrings, 1)
        };
    };

    let ears = [(Side::Left, face.get(LEFT_TRAGUS)), (Side::Right, face.get(RIGHT_TRAGUS))];
    let visible = ears.map(|(side, tragus)| ear_visible(tragus, side, metrics.center_x_norm));
    let front_view = visible.iter().all(|v| *v);

    let size = metrics.eye_distance * EARRING_SIZE_FACTOR * ctx.size_scale;
    let outward = size * if front_view { EARRING_OUTWARD_FRONT } else { EARRING_OUTWARD_SIDE };
    let drop = size * EARRING_DROP_FACTOR;

    let targets = ears
        .into_iter()
        .zip(visible)
        .map(|((side, tragus), is_visible)| {
            let anchor = Some(side.anchor());
            match tragus.filter(|_| is_visible) {
                Some(tragus) => {
                    let position = ctx.viewport.to_pixels(tragus) + Vector2::new(outward * side.outward(), drop);
                    AnchorTarget::visible(anchor, Pose::at(position, metrics.eye_angle, size))
                }
                None => AnchorTarget::hidden(anchor),
            }
        })
        .collect();

    Resolution {
        targets,
        front_view,
        ..Resolution::empty(Mode::Earrings, 1)
    }
}
