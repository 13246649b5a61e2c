use super::{ClipRegion, Placement, Sprite, Surface};
use crate::landmarks::Viewport;
use image::Rgba;
use nalgebra::Point2;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Image {
        id: String,
        placement: Placement,
        /// Whether a clip was active for this draw
        clipped: bool,
    },
    Circle {
        center: Point2<f64>,
        radius: f64,
        line_width: f64,
        color: [u8; 4],
    },
    Clip(Option<ClipRegion>),
}

/// Surface that keeps a log of draw calls, for tests and benchmarks
///
/// The log holds a single frame: [`Surface::clear`] drops everything recorded
/// before it.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    clipped: bool,
}

impl RecordingSurface {
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
            clipped: false,
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands recorded since the most recent clear
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        match self.commands.split_first() {
            Some((DrawCommand::Clear, rest)) => rest,
            _ => &self.commands,
        }
    }

    /// Image draws of the most recent frame
    pub fn images(&self) -> impl Iterator<Item = (&str, &Placement, bool)> {
        self.last_frame().iter().filter_map(|c| match c {
            DrawCommand::Image { id, placement, clipped } => Some((id.as_str(), placement, *clipped)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_image(&mut self, sprite: Sprite<'_>, placement: &Placement) {
        self.commands.push(DrawCommand::Image {
            id: sprite.id.to_string(),
            placement: *placement,
            clipped: self.clipped,
        });
    }

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, line_width: f64, color: Rgba<u8>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            line_width,
            color: color.0,
        });
    }

    fn set_clip(&mut self, clip: Option<ClipRegion>) {
        self.clipped = clip.is_some();
        self.commands.push(DrawCommand::Clip(clip));
    }
}
