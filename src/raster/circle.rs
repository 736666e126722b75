//! Midpoint circle rasterization.

use crate::geometry::Point;

/// Largest radius a circle shape may carry.
pub const MAX_CIRCLE_RADIUS: u32 = 1 << 16;

/// Rasterizes a circle outline of `radius` around `center`.
///
/// Walks the second octant with the integer midpoint decision variable and
/// mirrors each step into the other seven. The returned set is sorted and
/// free of duplicates, so radius 0 yields only the center. `radius` is
/// clamped to `MAX_CIRCLE_RADIUS`.
pub fn circle_pixels(center: Point, radius: u32) -> Vec<Point> {
    let radius = radius.min(MAX_CIRCLE_RADIUS) as i64;
    let mut pixels = Vec::new();

    let mut x: i64 = 0;
    let mut y: i64 = radius;
    let mut d: i64 = 1 - radius;

    while x <= y {
        for (ox, oy) in [
            (x, y),
            (-x, y),
            (x, -y),
            (-x, -y),
            (y, x),
            (-y, x),
            (y, -x),
            (-y, -x),
        ] {
            pixels.push(offset(center, ox, oy));
        }

        if d < 0 {
            d += 2 * x + 3;
        } else {
            d += 2 * (x - y) + 5;
            y -= 1;
        }
        x += 1;
    }

    pixels.sort_unstable();
    pixels.dedup();
    pixels
}

fn offset(center: Point, dx: i64, dy: i64) -> Point {
    let x = (center.x as i64 + dx).clamp(i32::MIN as i64, i32::MAX as i64);
    let y = (center.y as i64 + dy).clamp(i32::MIN as i64, i32::MAX as i64);
    Point::new(x as i32, y as i32)
}
