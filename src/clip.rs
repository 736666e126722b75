//! Cohen–Sutherland line clipping.
//!
//! ```text
//!        |        |
//!  1001  |  1000  | 1010        TOP    = y > ymax
//!        |        |
//! -------+--------+-------- ymax
//!        |        |
//!  0001  |  0000  | 0010
//!        |        |
//! -------+--------+-------- ymin
//!        |        |
//!  0101  |  0100  | 0110        BOTTOM = y < ymin
//!        |        |
//!      xmin     xmax
//! ```

use crate::geometry::{Point, PointF, Rect};

/// Boundary-violation bits for one endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcode(u8);

impl Outcode {
    pub const INSIDE: Outcode = Outcode(0);
    pub const LEFT: Outcode = Outcode(1);
    pub const RIGHT: Outcode = Outcode(2);
    pub const BOTTOM: Outcode = Outcode(4);
    pub const TOP: Outcode = Outcode(8);

    /// Computes the outcode of `(x, y)` against the inclusive window.
    pub fn of(x: f64, y: f64, window: &Rect) -> Outcode {
        let mut bits = 0;
        if x < window.min.x as f64 {
            bits |= Self::LEFT.0;
        } else if x > window.max.x as f64 {
            bits |= Self::RIGHT.0;
        }
        if y < window.min.y as f64 {
            bits |= Self::BOTTOM.0;
        } else if y > window.max.y as f64 {
            bits |= Self::TOP.0;
        }
        Outcode(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Outcode) -> bool {
        self.0 & other.0 != 0
    }
}

/// Outcome of clipping one segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipResult {
    /// Both endpoints were already inside the window.
    Unchanged,
    /// The visible part of the segment, endpoints in the original order.
    Clipped(Point, Point),
    /// No part of the segment is inside the window.
    Rejected,
}

// Each correction clears one boundary bit of one endpoint for good.
const MAX_CORRECTIONS: usize = 8;

/// Clips the segment `p0`–`p1` against `window`.
///
/// Intersections are computed in floating point on working copies and rounded
/// to the nearest pixel once, after the last correction.
pub fn clip_line(p0: Point, p1: Point, window: &Rect) -> ClipResult {
    let mut a = p0.to_f64();
    let mut b = p1.to_f64();
    let mut code_a = Outcode::of(a.x, a.y, window);
    let mut code_b = Outcode::of(b.x, b.y, window);

    if code_a.is_inside() && code_b.is_inside() {
        return ClipResult::Unchanged;
    }

    for _ in 0..MAX_CORRECTIONS {
        if code_a.is_inside() && code_b.is_inside() {
            return ClipResult::Clipped(a.round(), b.round());
        }
        if code_a.contains(code_b) {
            return ClipResult::Rejected;
        }

        let outside_is_a = !code_a.is_inside();
        let code_out = if outside_is_a { code_a } else { code_b };
        let hit = intersect(a, b, code_out, window);

        if outside_is_a {
            a = hit;
            code_a = Outcode::of(a.x, a.y, window);
        } else {
            b = hit;
            code_b = Outcode::of(b.x, b.y, window);
        }
    }

    log::warn!("clip of {:?}-{:?} did not converge; rejecting", p0, p1);
    ClipResult::Rejected
}

/// Intersects the segment with the first violated boundary in the fixed
/// order left, right, bottom, top.
///
/// The endpoints straddle that boundary whenever this is reached, so the
/// divisor is never zero.
fn intersect(a: PointF, b: PointF, code_out: Outcode, window: &Rect) -> PointF {
    let (xmin, ymin) = (window.min.x as f64, window.min.y as f64);
    let (xmax, ymax) = (window.max.x as f64, window.max.y as f64);
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if code_out.contains(Outcode::LEFT) {
        PointF::new(xmin, a.y + dy * (xmin - a.x) / dx)
    } else if code_out.contains(Outcode::RIGHT) {
        PointF::new(xmax, a.y + dy * (xmax - a.x) / dx)
    } else if code_out.contains(Outcode::BOTTOM) {
        PointF::new(a.x + dx * (ymin - a.y) / dy, ymin)
    } else {
        PointF::new(a.x + dx * (ymax - a.y) / dy, ymax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_corners(Point::new(10, 10), Point::new(50, 40))
    }

    #[test]
    fn outcodes_mark_each_side() {
        let w = window();
        assert_eq!(Outcode::of(30.0, 20.0, &w), Outcode::INSIDE);
        assert_eq!(Outcode::of(5.0, 20.0, &w), Outcode::LEFT);
        assert_eq!(Outcode::of(55.0, 20.0, &w), Outcode::RIGHT);
        assert_eq!(Outcode::of(30.0, 5.0, &w), Outcode::BOTTOM);
        assert_eq!(Outcode::of(30.0, 45.0, &w), Outcode::TOP);
        assert_eq!(Outcode::of(5.0, 45.0, &w).bits(), 1 | 8);
        assert_eq!(Outcode::of(10.0, 40.0, &w), Outcode::INSIDE);
    }

    #[test]
    fn inside_segment_is_unchanged() {
        let result = clip_line(Point::new(12, 12), Point::new(48, 38), &window());
        assert_eq!(result, ClipResult::Unchanged);
    }

    #[test]
    fn segment_on_one_outer_side_is_rejected() {
        assert_eq!(
            clip_line(Point::new(0, 0), Point::new(8, 45), &window()),
            ClipResult::Rejected
        );
        assert_eq!(
            clip_line(Point::new(60, 12), Point::new(90, 38), &window()),
            ClipResult::Rejected
        );
    }

    #[test]
    fn crossing_left_boundary_lands_on_it() {
        let result = clip_line(Point::new(0, 20), Point::new(30, 26), &window());
        assert_eq!(
            result,
            ClipResult::Clipped(Point::new(10, 22), Point::new(30, 26))
        );
    }

    #[test]
    fn crossing_top_boundary_keeps_order() {
        match clip_line(Point::new(20, 20), Point::new(40, 60), &window()) {
            ClipResult::Clipped(a, b) => {
                assert_eq!(a, Point::new(20, 20));
                assert_eq!(b.y, 40);
                assert_eq!(b.x, 30);
            }
            other => panic!("expected clipped, got {other:?}"),
        }
    }

    #[test]
    fn diagonal_through_two_corners_regions() {
        match clip_line(Point::new(0, 0), Point::new(60, 50), &window()) {
            ClipResult::Clipped(a, b) => {
                assert!(window().contains(a));
                assert!(window().contains(b));
                assert!(a.x == 10 || a.y == 10);
                assert!(b.x == 50 || b.y == 40);
            }
            other => panic!("expected clipped, got {other:?}"),
        }
    }

    #[test]
    fn segment_missing_corner_is_rejected() {
        // Passes outside the bottom-left corner without touching the window.
        let result = clip_line(Point::new(0, 15), Point::new(15, 0), &window());
        assert_eq!(result, ClipResult::Rejected);
    }

    #[test]
    fn degenerate_point_outside_is_rejected() {
        assert_eq!(
            clip_line(Point::new(5, 5), Point::new(5, 5), &window()),
            ClipResult::Rejected
        );
    }
}
