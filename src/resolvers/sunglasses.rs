use super::{AnchorTarget, FaceMetrics, Mode, ResolveContext, Resolution};
use crate::constants::{SUNGLASSES_EYE_SPAN_FACTOR, SUNGLASSES_FIT_FACTOR};
use crate::pose::Pose;

/// Sunglasses centred on the eye line, drawn without smoothing
pub fn resolve(ctx: &ResolveContext<'_>) -> Resolution {
    let Some(face) = ctx.input.face.as_ref() else {
        return Resolution::empty(Mode::Sunglasses, 0);
    };

    let target = FaceMetrics::measure(face, ctx.viewport).map_or(AnchorTarget::hidden(None), |metrics| {
        let width = metrics.eye_distance * SUNGLASSES_EYE_SPAN_FACTOR * SUNGLASSES_FIT_FACTOR * ctx.size_scale;
        AnchorTarget::visible(None, Pose::at(metrics.eye_mid, metrics.eye_angle, width))
    });

    Resolution {
        targets: vec![target],
        ..Resolution::empty(Mode::Sunglasses, 1)
    }
}
