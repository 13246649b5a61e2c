use super::{ClipRegion, Placement, Sprite, Surface};
use crate::landmarks::Viewport;
use crate::utils::safe_cast::{f64_to_f32, surface_dimension};
use crate::{Error, Result};
use image::{Rgba, RgbaImage};
use log::warn;
use nalgebra::Point2;
use std::path::Path;
use tiny_skia::{Color, ColorU8, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};

/// Transparent RGBA canvas sized `viewport × device ratio`
pub struct RasterSurface {
    viewport: Viewport,
    /// Logical to device pixels
    scale: Transform,
    pixmap: Pixmap,
    mask: Option<Mask>,
}

impl RasterSurface {
    /// Create a cleared surface for the given frame geometry
    ///
    /// # Errors
    ///
    /// Returns an error if the scaled dimensions are not representable
    pub fn new(viewport: Viewport) -> Result<Self> {
        let ratio = viewport.device_ratio();
        let width = surface_dimension(viewport.width * ratio)?;
        let height = surface_dimension(viewport.height * ratio)?;
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::InvalidInput(format!("Cannot allocate a {width}x{height} surface")))?;

        Ok(Self {
            viewport,
            scale: Transform::from_scale(f64_to_f32(ratio), f64_to_f32(ratio)),
            pixmap,
            mask: None,
        })
    }

    /// Copy the canvas out as straight-alpha RGBA
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        image
    }

    /// Write the canvas to disk; the format follows the file extension
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}

/// Premultiplied copy of a decoded image, `None` for empty images
fn pixmap_from_image(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

impl Surface for RasterSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn draw_image(&mut self, sprite: Sprite<'_>, placement: &Placement) {
        if !placement.is_drawable() {
            return;
        }
        let Some(source) = pixmap_from_image(sprite.image) else {
            return;
        };

        let (width, height) = sprite.image.dimensions();
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = self.scale.pre_concat(placement.image_transform(width, height));
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, self.mask.as_ref());
    }

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, line_width: f64, color: Rgba<u8>) {
        if !(line_width.is_finite() && line_width > 0.0) {
            return;
        }
        let Some(path) = PathBuilder::from_circle(f64_to_f32(center.x), f64_to_f32(center.y), f64_to_f32(radius)) else {
            return;
        };

        let [r, g, b, a] = color.0;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: f64_to_f32(line_width),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, self.scale, self.mask.as_ref());
    }

    fn set_clip(&mut self, clip: Option<ClipRegion>) {
        self.mask = clip.and_then(|clip| {
            let mask = clip.to_mask(self.pixmap.width(), self.pixmap.height(), self.scale);
            if mask.is_none() {
                warn!("Clip region could not be rasterized, drawing unclipped");
            }
            mask
        });
    }
}
