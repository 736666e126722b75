//! Scene rasterization into batched pixel output.
//!
//! Rendering walks the scene in draw order, dispatches each shape to its
//! rasterizer and collects every pixel into a single [`PixelBatch`]. The
//! batch is handed to a [`DisplaySink`] in one call.

use super::color::{Color, RED};
use super::scene::Scene;
use super::shape::{Shape, ShapeKind};
use crate::clip::{ClipResult, clip_line};
use crate::error::Result;
use crate::fill::{fill_polygon, polygon_outline};
use crate::geometry::{Point, Rect};
use crate::raster::{DEFAULT_MAX_BEZIER_STEPS, bezier_pixels, circle_pixels, line_pixels, polyline_pixels};
use log::{debug, warn};

/// A pixel coordinate paired with the color to paint it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColoredPixel {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// All pixels produced by one redraw, in paint order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelBatch {
    pixels: Vec<ColoredPixel>,
}

impl PixelBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every point in `points` with a single color.
    pub fn extend_points(&mut self, points: impl IntoIterator<Item = Point>, color: Color) {
        self.pixels
            .extend(points.into_iter().map(|p| ColoredPixel { x: p.x, y: p.y, color }));
    }

    pub fn pixels(&self) -> &[ColoredPixel] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl IntoIterator for PixelBatch {
    type Item = ColoredPixel;
    type IntoIter = std::vec::IntoIter<ColoredPixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels.into_iter()
    }
}

/// Receives rendered output.
///
/// Implementations get exactly one call per redraw and must drop pixels
/// outside `width × height` themselves.
pub trait DisplaySink {
    fn present(&mut self, batch: &PixelBatch, width: u32, height: u32);
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn present(&mut self, batch: &PixelBatch, width: u32, height: u32) {
        (**self).present(batch, width, height);
    }
}

/// Rendering knobs that do not belong to any single shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    /// Color of the clip window outline, or `None` to hide it.
    pub clip_outline: Option<Color>,
    pub bezier_max_steps: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            clip_outline: Some(RED),
            bezier_max_steps: DEFAULT_MAX_BEZIER_STEPS,
        }
    }
}

/// Rasterizes a single shape.
///
/// `clip` is applied to Line shapes only; a fully rejected line yields no
/// pixels. Polygons with fewer than three vertices fail with
/// `InsufficientVertices`.
pub fn rasterize_shape(shape: &Shape, style: &RenderStyle, clip: Option<&Rect>) -> Result<Vec<Point>> {
    let pixels = match &shape.kind {
        ShapeKind::Line { start, end } => match clip {
            None => line_pixels(*start, *end),
            Some(window) => match clip_line(*start, *end, window) {
                ClipResult::Unchanged => line_pixels(*start, *end),
                ClipResult::Clipped(a, b) => line_pixels(a, b),
                ClipResult::Rejected => Vec::new(),
            },
        },
        ShapeKind::Circle { center, radius } => circle_pixels(*center, *radius),
        ShapeKind::Bezier { control } => bezier_pixels(control, style.bezier_max_steps),
        ShapeKind::Character { anchor, glyph, scale } => glyph.pixels(*anchor, *scale),
        ShapeKind::Polygon { points, filled: true } => fill_polygon(points)?,
        ShapeKind::Polygon { points, filled: false } => polygon_outline(points)?,
    };
    Ok(pixels)
}

/// Renders the whole scene into one batch.
///
/// Shapes that fail to rasterize are skipped with a warning. The clip window
/// outline, when set and enabled in `style`, is painted first, underneath
/// the shapes.
pub fn render_scene(scene: &Scene, style: &RenderStyle) -> PixelBatch {
    let clip = scene.active_clip();
    let mut batch = PixelBatch::new();

    if let (Some(window), Some(color)) = (scene.clip_window(), style.clip_outline) {
        batch.extend_points(polyline_pixels(&window.rect.corners(), true), color);
    }

    for shape in scene.shapes() {
        match rasterize_shape(shape, style, clip.as_ref()) {
            Ok(points) => batch.extend_points(points, shape.color),
            Err(err) => warn!("skipping shape {} ({}): {}", shape.id, shape.kind.type_name(), err),
        }
    }

    debug!("rendered {} shape(s) into {} pixel(s)", scene.len(), batch.len());
    batch
}
