//! Drawing smoothed poses onto a [`Surface`].
//!
//! One frame is described by a [`Scene`]: the active mode, the smoothed poses
//! to draw and an optional occlusion clip. [`compose`] clears the surface and
//! renders exactly that mode.

use crate::constants::{
    NECKLACE_CLAMP_X, NECKLACE_CLAMP_Y, NECKLACE_TOP_OFFSET, RING_DRAW_SIZE_FACTOR, RING_PLACEHOLDER_COLOR,
    RING_PLACEHOLDER_LINE_FACTOR, RING_PLACEHOLDER_MIN_LINE, SUNGLASSES_TOP_OFFSET,
};
use crate::pose::Pose;
use crate::resolvers::Mode;
use crate::surface::{ClipRegion, Placement, Sprite, Surface};
use crate::utils::clamp_to_canvas;
use image::Rgba;
use std::f64::consts::FRAC_PI_2;

/// Everything the compositor needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub mode: Mode,
    /// Smoothed poses of the visible overlay instances, in draw order
    pub poses: Vec<Pose>,
    /// Occlusion clip, earrings only
    pub clip: Option<ClipRegion>,
    pub size_scale: f64,
}

impl Scene {
    #[must_use]
    pub const fn new(mode: Mode, size_scale: f64) -> Self {
        Self {
            mode,
            poses: Vec::new(),
            clip: None,
            size_scale,
        }
    }
}

/// Clear the surface and draw the scene
///
/// `sprite` is the selected accessory image if it is ready. Without one only
/// rings draw anything (a procedural placeholder); every other mode skips.
pub fn compose(surface: &mut dyn Surface, scene: &Scene, sprite: Option<Sprite<'_>>) {
    surface.clear();

    match (scene.mode, sprite) {
        (Mode::Rings, sprite) => {
            for pose in &scene.poses {
                draw_ring(surface, sprite, pose, scene.size_scale);
            }
        }
        (Mode::Sunglasses, Some(sprite)) => {
            for pose in &scene.poses {
                draw_sunglasses(surface, sprite, pose);
            }
        }
        (Mode::Necklace, Some(sprite)) => {
            for pose in &scene.poses {
                draw_necklace(surface, sprite, pose);
            }
        }
        (Mode::Earrings, Some(sprite)) => draw_earrings(surface, sprite, &scene.poses, scene.clip.clone()),
        (_, None) => {}
    }
}

/// Ring image rotated along the finger, or a gold outline while it loads
///
/// `pose.scale` is the ring radius.
pub fn draw_ring(surface: &mut dyn Surface, sprite: Option<Sprite<'_>>, pose: &Pose, size_scale: f64) {
    let radius = pose.scale;
    match sprite {
        Some(sprite) => {
            let size = radius * RING_DRAW_SIZE_FACTOR * size_scale;
            let placement = Placement::centered(pose.position(), pose.angle - FRAC_PI_2, size, size);
            surface.draw_image(sprite, &placement);
        }
        None => {
            let line_width = (radius * RING_PLACEHOLDER_LINE_FACTOR).max(RING_PLACEHOLDER_MIN_LINE);
            surface.stroke_circle(pose.position(), radius, line_width, Rgba(RING_PLACEHOLDER_COLOR));
        }
    }
}

/// Sunglasses hung from the eye line; `pose.scale` is the frame width
pub fn draw_sunglasses(surface: &mut dyn Surface, sprite: Sprite<'_>, pose: &Pose) {
    let width = pose.scale;
    let height = width / sprite.aspect();
    let placement = Placement {
        center: pose.position(),
        angle: pose.angle,
        left: -width / 2.0,
        top: -height * SUNGLASSES_TOP_OFFSET,
        width,
        height,
    };
    surface.draw_image(sprite, &placement);
}

/// Necklace kept mostly on screen; `pose.scale` is the necklace width
pub fn draw_necklace(surface: &mut dyn Surface, sprite: Sprite<'_>, pose: &Pose) {
    let viewport = surface.viewport();
    let width = pose.scale;
    let height = width / sprite.aspect();
    let anchor = clamp_to_canvas(
        pose.position(),
        viewport.width,
        viewport.height,
        width * NECKLACE_CLAMP_X,
        height * NECKLACE_CLAMP_Y,
    );
    let placement = Placement {
        center: anchor,
        angle: pose.angle,
        left: -width / 2.0,
        top: -height * NECKLACE_TOP_OFFSET,
        width,
        height,
    };
    surface.draw_image(sprite, &placement);
}

/// Both earrings under the occlusion clip; `pose.scale` is the earring width
pub fn draw_earrings(surface: &mut dyn Surface, sprite: Sprite<'_>, poses: &[Pose], clip: Option<ClipRegion>) {
    let clipped = clip.is_some();
    if clipped {
        surface.set_clip(clip);
    }

    let viewport = surface.viewport();
    for pose in poses {
        let size = pose.scale;
        let half = size / 2.0;
        let center = clamp_to_canvas(pose.position(), viewport.width, viewport.height, half, half);
        let placement = Placement::centered(center, pose.angle, size, size / sprite.aspect());
        surface.draw_image(sprite, &placement);
    }

    if clipped {
        surface.set_clip(None);
    }
}
