//! Output surfaces the compositor draws onto.
//!
//! Draw calls are expressed in logical frame pixels; each surface maps them
//! onto its own backing store (see [`Viewport::device_ratio`]).

/// Rasterizer backed by a `tiny_skia::Pixmap`
pub mod raster;

/// Surface that records draw calls instead of painting
pub mod recording;

pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordingSurface};

use crate::landmarks::Viewport;
use crate::utils::safe_cast::f64_to_f32;
use image::{Rgba, RgbaImage};
use nalgebra::Point2;
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Rect, Transform};

/// A decoded accessory image together with its catalog id
#[derive(Debug, Clone, Copy)]
pub struct Sprite<'a> {
    pub id: &'a str,
    pub image: &'a RgbaImage,
}

impl Sprite<'_> {
    /// Width over height, 1.0 for degenerate images
    #[must_use]
    pub fn aspect(&self) -> f64 {
        aspect_ratio(self.image)
    }
}

/// Width over height of an image, 1.0 for degenerate images
#[must_use]
pub fn aspect_ratio(image: &RgbaImage) -> f64 {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        1.0
    } else {
        f64::from(w) / f64::from(h)
    }
}

/// Where an image lands: translate to `center`, rotate by `angle`, then
/// fill the rectangle `(left, top, width, height)` in the rotated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Point2<f64>,
    pub angle: f64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    /// Rectangle centred on `center`
    #[must_use]
    pub fn centered(center: Point2<f64>, angle: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            angle,
            left: -width / 2.0,
            top: -height / 2.0,
            width,
            height,
        }
    }

    /// Whether the rectangle has a drawable, finite extent
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        [self.center.x, self.center.y, self.angle, self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Affine map from image pixels onto the placed rectangle, in
    /// logical frame pixels
    #[must_use]
    pub fn image_transform(&self, image_width: u32, image_height: u32) -> Transform {
        Transform::from_translate(f64_to_f32(self.center.x), f64_to_f32(self.center.y))
            .pre_concat(Transform::from_rotate(f64_to_f32(self.angle.to_degrees())))
            .pre_translate(f64_to_f32(self.left), f64_to_f32(self.top))
            .pre_scale(
                f64_to_f32(self.width / f64::from(image_width.max(1))),
                f64_to_f32(self.height / f64::from(image_height.max(1))),
            )
    }
}

/// Paintable area: the canvas rectangle with a polygon cut out (even-odd)
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRegion {
    width: f64,
    height: f64,
    polygon: Vec<Point2<f64>>,
}

impl ClipRegion {
    /// Clip that paints everywhere on a `width` × `height` canvas except
    /// inside `polygon`
    #[must_use]
    pub fn excluding(width: f64, height: f64, polygon: Vec<Point2<f64>>) -> Self {
        Self { width, height, polygon }
    }

    #[must_use]
    pub fn polygon(&self) -> &[Point2<f64>] {
        &self.polygon
    }

    /// Canvas rectangle plus the polygon as one path, to be filled even-odd
    ///
    /// Polygons with fewer than three points cut nothing out.
    #[must_use]
    pub fn path(&self) -> Option<Path> {
        let mut builder = PathBuilder::new();
        builder.push_rect(Rect::from_xywh(0.0, 0.0, f64_to_f32(self.width), f64_to_f32(self.height))?);
        if let [first, rest @ ..] = self.polygon.as_slice() {
            if rest.len() >= 2 {
                builder.move_to(f64_to_f32(first.x), f64_to_f32(first.y));
                for point in rest {
                    builder.line_to(f64_to_f32(point.x), f64_to_f32(point.y));
                }
                builder.close();
            }
        }
        builder.finish()
    }

    /// Rasterize the paintable area into a `width` × `height` device mask
    ///
    /// `transform` maps logical pixels to device pixels.
    #[must_use]
    pub fn to_mask(&self, width: u32, height: u32, transform: Transform) -> Option<Mask> {
        let path = self.path()?;
        let mut mask = Mask::new(width, height)?;
        mask.fill_path(&path, FillRule::EvenOdd, true, transform);
        Some(mask)
    }
}

/// A 2D drawing target matching the video frame
pub trait Surface {
    /// Logical frame geometry this surface was created for
    fn viewport(&self) -> Viewport;

    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Draw an image according to `placement`, honouring the active clip
    fn draw_image(&mut self, sprite: Sprite<'_>, placement: &Placement);

    /// Stroke a circle outline, honouring the active clip
    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, line_width: f64, color: Rgba<u8>);

    /// Install (`Some`) or remove (`None`) the clip for subsequent draws
    fn set_clip(&mut self, clip: Option<ClipRegion>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(10.0, 10.0),
            Point2::new(20.0, 10.0),
            Point2::new(20.0, 20.0),
            Point2::new(10.0, 20.0),
        ]
    }

    fn coverage(mask: &Mask, x: u32, y: u32) -> u8 {
        mask.data()[(y * mask.width() + x) as usize]
    }

    #[test]
    fn test_clip_mask_excludes_polygon_interior() {
        let clip = ClipRegion::excluding(100.0, 100.0, square());
        let mask = clip.to_mask(100, 100, Transform::identity()).unwrap();
        assert_eq!(coverage(&mask, 15, 15), 0);
        assert_eq!(coverage(&mask, 50, 50), 255);
        assert_eq!(coverage(&mask, 5, 15), 255);
    }

    #[test]
    fn test_clip_mask_follows_device_scale() {
        let clip = ClipRegion::excluding(100.0, 100.0, square());
        let mask = clip.to_mask(200, 200, Transform::from_scale(2.0, 2.0)).unwrap();
        assert_eq!(coverage(&mask, 30, 30), 0);
        assert_eq!(coverage(&mask, 15, 15), 255);
        assert_eq!(coverage(&mask, 150, 150), 255);
    }

    #[test]
    fn test_degenerate_polygon_cuts_nothing() {
        let clip = ClipRegion::excluding(100.0, 100.0, square()[..2].to_vec());
        let mask = clip.to_mask(100, 100, Transform::identity()).unwrap();
        assert!(mask.data().iter().all(|&value| value == 255));
    }

    #[test]
    fn test_placement_image_transform() {
        let placement = Placement::centered(Point2::new(50.0, 50.0), 0.0, 20.0, 10.0);
        let mut corners = [tiny_skia::Point::from_xy(0.0, 0.0), tiny_skia::Point::from_xy(4.0, 2.0)];
        placement.image_transform(4, 2).map_points(&mut corners);
        assert_eq!((corners[0].x, corners[0].y), (40.0, 45.0));
        assert_eq!((corners[1].x, corners[1].y), (60.0, 55.0));

        // A quarter turn swaps the extents
        let rotated = Placement::centered(Point2::new(50.0, 50.0), FRAC_PI_2, 20.0, 10.0);
        let mut far = [tiny_skia::Point::from_xy(4.0, 2.0)];
        rotated.image_transform(4, 2).map_points(&mut far);
        assert!((far[0].x - 45.0).abs() < 1e-4);
        assert!((far[0].y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_placement_drawable() {
        assert!(Placement::centered(Point2::new(0.0, 0.0), 0.0, 1.0, 1.0).is_drawable());
        assert!(!Placement::centered(Point2::new(0.0, 0.0), 0.0, 0.0, 1.0).is_drawable());
        assert!(!Placement::centered(Point2::new(f64::NAN, 0.0), 0.0, 1.0, 1.0).is_drawable());
    }
}
