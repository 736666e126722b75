//! Geometry primitives shared by the rasterizers, clipper, fill engine and transforms.
//!
//! Control points are stored as integer [`Point`]s. Transform math runs on
//! [`PointF`] and is rounded back to integers once per transform call.

use serde::{Deserialize, Serialize};

/// Integer pixel / control point coordinate.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Real-valued copy of this point.
    pub fn to_f64(self) -> PointF {
        PointF::new(self.x as f64, self.y as f64)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x as f64 - self.x as f64;
        let dy = other.y as f64 - self.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Offsets the point by `(dx, dy)`, returning `None` on overflow.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Point> {
        Some(Point::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// Real-valued point used during transform math.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rounds to the nearest integer point (halves away from zero).
    ///
    /// Values outside the `i32` range saturate.
    pub fn round(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle with inclusive corners.
///
/// Used both as the clip window and as a shape's bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Builds a rectangle from any two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest rectangle covering every point, or `None` for an empty slice.
    pub fn covering(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Rect {
            min: *first,
            max: *first,
        };
        for point in rest {
            rect.include(*point);
        }
        Some(rect)
    }

    /// Grows the rectangle to include `point`.
    pub fn include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Smallest rectangle covering both inputs.
    pub fn union(self, other: Rect) -> Rect {
        let mut rect = self;
        rect.include(other.min);
        rect.include(other.max);
        rect
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub fn width(&self) -> i64 {
        self.max.x as i64 - self.min.x as i64 + 1
    }

    pub fn height(&self) -> i64 {
        self.max.y as i64 - self.min.y as i64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(3, -4)).unwrap();
        assert_eq!(json, "[3,-4]");
        let back: Point = serde_json::from_str("[7,8]").unwrap();
        assert_eq!(back, Point::new(7, 8));
    }

    #[test]
    fn rect_normalizes_corners() {
        let rect = Rect::from_corners(Point::new(10, 2), Point::new(-3, 8));
        assert_eq!(rect.min, Point::new(-3, 2));
        assert_eq!(rect.max, Point::new(10, 8));
        assert_eq!(rect.width(), 14);
        assert_eq!(rect.height(), 7);
        assert!(rect.contains(Point::new(10, 8)));
        assert!(!rect.contains(Point::new(11, 8)));
    }

    #[test]
    fn covering_handles_empty_and_single() {
        assert!(Rect::covering(&[]).is_none());
        let rect = Rect::covering(&[Point::new(4, 4)]).unwrap();
        assert_eq!(rect.min, rect.max);
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(PointF::new(2.5, -2.5).round(), Point::new(3, -3));
        assert_eq!(PointF::new(2.49, -0.4).round(), Point::new(2, 0));
    }

    #[test]
    fn checked_offset_detects_overflow() {
        assert!(Point::new(i32::MAX, 0).checked_offset(1, 0).is_none());
        assert_eq!(
            Point::new(1, 1).checked_offset(-2, 3),
            Some(Point::new(-1, 4))
        );
    }
}
