//! Owned RGBA render surface at a canonical resolution.

use image::{Pixel, Rgba, RgbaImage};

use crate::settings::Color;

/// The render surface every frame is composed onto.
///
/// Always a fixed canonical resolution (e.g. 1920x1080); on-screen scaling is
/// a presentation concern that never touches these pixels.
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
        };
        surface.clear();
        surface
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Recreate the buffer at a new resolution. In-flight content is lost,
    /// which is fine: every frame redraws from scratch.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.dimensions() != (width, height) {
            self.image = RgbaImage::new(width.max(1), height.max(1));
            self.clear();
        }
    }

    /// Reset every pixel to opaque black.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgba([0, 0, 0, 255]);
        }
    }

    /// Write one pixel opaquely, ignoring out-of-bounds coordinates.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, Rgba(color));
        }
    }

    /// Alpha-blend one pixel over the existing content.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image
                .get_pixel_mut(x as u32, y as u32)
                .blend(&Rgba(color));
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.image.get_pixel(x, y).0
    }

    /// Blit an image at an offset (possibly negative), clipping to bounds.
    pub fn blit(&mut self, src: &RgbaImage, dx: i64, dy: i64) {
        let (w, h) = self.dimensions();
        for (sx, sy, px) in src.enumerate_pixels() {
            let tx = dx + sx as i64;
            let ty = dy + sy as i64;
            if tx >= 0 && ty >= 0 && (tx as u32) < w && (ty as u32) < h {
                self.image.put_pixel(tx as u32, ty as u32, *px);
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Raw RGBA bytes, row-major, for the capture pipeline.
    /// Consume the surface, handing its raw RGBA bytes to the exporter.
    pub fn into_pixels(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}
