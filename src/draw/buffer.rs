//! In-memory RGBA display sink.

use super::color::Color;
use super::render::{DisplaySink, PixelBatch};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use log::{debug, info};
use std::path::Path;

/// Canvas-sized RGBA surface that accepts rendered batches.
///
/// Every [`present`](DisplaySink::present) clears the surface to the
/// background color first, then paints the batch in order. Pixels outside the
/// extent are silently dropped.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    image: RgbaImage,
    background: Color,
    dropped: usize,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(background.to_rgba())),
            background,
            dropped: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of pixels dropped by the last present for falling off the canvas.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (x, y) = self.index(x, y)?;
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Some(Color::new(r, g, b, a))
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.image.width() && y < self.image.height()).then_some((x, y))
    }

    pub fn clear(&mut self) {
        let bg = Rgba(self.background.to_rgba());
        for pixel in self.image.pixels_mut() {
            *pixel = bg;
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Writes the surface as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("failed to write PNG {}", path.display()))?;
        info!(
            "Wrote {}x{} PNG to {}",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(())
    }
}

impl DisplaySink for PixelBuffer {
    fn present(&mut self, batch: &PixelBatch, width: u32, height: u32) {
        if (width, height) != self.image.dimensions() {
            debug!(
                "resizing pixel buffer {:?} -> {}x{}",
                self.image.dimensions(),
                width,
                height
            );
            self.image = RgbaImage::new(width, height);
        }
        self.clear();

        let mut dropped = 0;
        for pixel in batch.pixels() {
            match self.index(pixel.x, pixel.y) {
                Some((x, y)) => self.image.put_pixel(x, y, Rgba(pixel.color.to_rgba())),
                None => dropped += 1,
            }
        }
        self.dropped = dropped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};
    use crate::geometry::Point;

    #[test]
    fn present_paints_and_drops_out_of_extent() {
        let mut batch = PixelBatch::new();
        batch.extend_points([Point::new(1, 1), Point::new(-1, 0), Point::new(4, 0)], RED);
        let mut buffer = PixelBuffer::new(4, 4, WHITE);
        buffer.present(&batch, 4, 4);

        assert_eq!(buffer.get_pixel(1, 1), Some(RED));
        assert_eq!(buffer.get_pixel(0, 0), Some(WHITE));
        assert_eq!(buffer.get_pixel(4, 0), None);
        assert_eq!(buffer.dropped(), 2);
    }

    #[test]
    fn later_pixels_paint_over_earlier() {
        let mut batch = PixelBatch::new();
        batch.extend_points([Point::new(2, 2)], RED);
        batch.extend_points([Point::new(2, 2)], BLACK);
        let mut buffer = PixelBuffer::new(3, 3, WHITE);
        buffer.present(&batch, 3, 3);
        assert_eq!(buffer.get_pixel(2, 2), Some(BLACK));
    }

    #[test]
    fn present_clears_previous_frame_and_resizes() {
        let mut batch = PixelBatch::new();
        batch.extend_points([Point::new(0, 0)], RED);
        let mut buffer = PixelBuffer::new(2, 2, WHITE);
        buffer.present(&batch, 2, 2);
        buffer.present(&PixelBatch::new(), 5, 3);
        assert_eq!((buffer.width(), buffer.height()), (5, 3));
        assert_eq!(buffer.get_pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn saves_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let buffer = PixelBuffer::new(8, 8, WHITE);
        buffer.save_png(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
