//! Shape definitions.
//!
//! Control points are the only stored geometry; pixels are always derived by
//! the rasterizers, which keeps shapes editable after transforms and reloads.

use super::color::Color;
use crate::error::{EngineError, Result};
use crate::geometry::{Point, Rect};
use crate::raster::{GLYPH_SIZE, Glyph, MAX_CIRCLE_RADIUS, MAX_GLYPH_SCALE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the scene for edit tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A drawable shape: its geometry plus the attributes shared by every variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub color: Color,
    pub kind: ShapeKind,
}

/// Geometry of a shape, one variant per primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// Straight segment between two control points.
    Line { start: Point, end: Point },
    /// Circle outline around `center`.
    Circle { center: Point, radius: u32 },
    /// Cubic Bezier; always exactly four control points.
    Bezier { control: [Point; 4] },
    /// 8×8 bitmap glyph with its top-left corner at `anchor`.
    Character {
        anchor: Point,
        glyph: Glyph,
        /// Side length, in pixels, of one glyph cell
        scale: u32,
    },
    /// Closed polygon. Fewer than three points is only valid while the
    /// polygon is still being drawn.
    Polygon { points: Vec<Point>, filled: bool },
}

impl ShapeKind {
    pub fn line(start: Point, end: Point) -> Self {
        ShapeKind::Line { start, end }
    }

    pub fn circle(center: Point, radius: u32) -> Self {
        ShapeKind::Circle { center, radius }
    }

    /// Circle whose radius is the rounded distance from `center` to `edge`,
    /// capped at `MAX_CIRCLE_RADIUS`.
    pub fn circle_through(center: Point, edge: Point) -> Self {
        let radius = center.distance(edge).round().min(MAX_CIRCLE_RADIUS as f64) as u32;
        ShapeKind::Circle { center, radius }
    }

    pub fn bezier(control: [Point; 4]) -> Self {
        ShapeKind::Bezier { control }
    }

    /// Builds a Bezier from a slice, which must hold exactly four points.
    pub fn bezier_from_slice(points: &[Point]) -> Result<Self> {
        let control: [Point; 4] = points.try_into().map_err(|_| {
            EngineError::malformed(0, format!("bezier needs 4 control points, got {}", points.len()))
        })?;
        Ok(ShapeKind::Bezier { control })
    }

    /// Character shape; fails with `InvalidGlyph` for unsupported identifiers.
    ///
    /// `scale` is clamped to `1..=MAX_GLYPH_SCALE`.
    pub fn character(anchor: Point, glyph_id: char, scale: u32) -> Result<Self> {
        Ok(ShapeKind::Character {
            anchor,
            glyph: Glyph::try_from(glyph_id)?,
            scale: scale.clamp(1, MAX_GLYPH_SCALE),
        })
    }

    pub fn polygon(points: Vec<Point>, filled: bool) -> Self {
        ShapeKind::Polygon { points, filled }
    }

    /// Persistence discriminant for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeKind::Line { .. } => "line",
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Bezier { .. } => "bezier",
            ShapeKind::Character { .. } => "character",
            ShapeKind::Polygon { .. } => "polygon",
        }
    }

    /// Control points in their canonical order.
    pub fn control_points(&self) -> Vec<Point> {
        match self {
            ShapeKind::Line { start, end } => vec![*start, *end],
            ShapeKind::Circle { center, .. } => vec![*center],
            ShapeKind::Bezier { control } => control.to_vec(),
            ShapeKind::Character { anchor, .. } => vec![*anchor],
            ShapeKind::Polygon { points, .. } => points.clone(),
        }
    }

    /// Axis-aligned box covering every pixel the shape can produce.
    ///
    /// Returns `None` only for a polygon with no points.
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            ShapeKind::Line { start, end } => Some(Rect::from_corners(*start, *end)),
            ShapeKind::Circle { center, radius } => {
                let r = (*radius).min(i32::MAX as u32) as i32;
                Some(Rect::from_corners(
                    Point::new(center.x.saturating_sub(r), center.y.saturating_sub(r)),
                    Point::new(center.x.saturating_add(r), center.y.saturating_add(r)),
                ))
            }
            // The curve stays inside the hull of its control points.
            ShapeKind::Bezier { control } => Rect::covering(control),
            ShapeKind::Character { anchor, scale, .. } => {
                let extent = (GLYPH_SIZE as i64 * *scale as i64 - 1).min(i32::MAX as i64) as i32;
                Some(Rect::from_corners(
                    *anchor,
                    Point::new(
                        anchor.x.saturating_add(extent),
                        anchor.y.saturating_add(extent),
                    ),
                ))
            }
            ShapeKind::Polygon { points, .. } => Rect::covering(points),
        }
    }
}

impl Shape {
    pub fn new(id: ShapeId, color: Color, kind: ShapeKind) -> Self {
        Self { id, color, kind }
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        self.kind.bounding_box()
    }

    pub fn is_line(&self) -> bool {
        matches!(self.kind, ShapeKind::Line { .. })
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self.kind, ShapeKind::Polygon { .. })
    }
}
