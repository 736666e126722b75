//! Bresenham line rasterization.

use crate::geometry::Point;
use std::iter::FusedIterator;

/// Lazy Bresenham walk from `start` to `end`, both endpoints included.
///
/// Uses the integer error-accumulator form, which covers all eight octants
/// through the step signs `sx`/`sy` without an explicit axis swap. Each step
/// moves one unit in x, y or both, so the output has no gaps.
#[derive(Clone, Debug)]
pub struct LineIter {
    x: i32,
    y: i32,
    end: Point,
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl LineIter {
    pub fn new(start: Point, end: Point) -> Self {
        let dx = (end.x as i64 - start.x as i64).abs();
        let dy = (end.y as i64 - start.y as i64).abs();
        Self {
            x: start.x,
            y: start.y,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for LineIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }

        let current = Point::new(self.x, self.y);
        if current == self.end {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining_x = (self.end.x as i64 - self.x as i64).unsigned_abs();
        let remaining_y = (self.end.y as i64 - self.y as i64).unsigned_abs();
        let remaining = remaining_x.max(remaining_y) as usize + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LineIter {}

impl FusedIterator for LineIter {}

/// Collects the Bresenham pixels between two points.
pub fn line_pixels(start: Point, end: Point) -> Vec<Point> {
    LineIter::new(start, end).collect()
}

/// Rasterizes consecutive segments of `points`, optionally closing the loop.
///
/// Shared joints between segments are emitted once.
pub fn polyline_pixels(points: &[Point], closed: bool) -> Vec<Point> {
    let mut pixels = Vec::new();
    match points {
        [] => return pixels,
        [single] => {
            pixels.push(*single);
            return pixels;
        }
        _ => {}
    }

    let closing = if closed { points.first().zip(points.last()) } else { None };
    let segments = points
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .chain(closing.map(|(first, last)| (*last, *first)));

    for (start, end) in segments {
        let skip = usize::from(!pixels.is_empty() && pixels.last() == Some(&start));
        pixels.extend(LineIter::new(start, end).skip(skip));
    }

    if closed && pixels.len() > 1 && pixels.first() == pixels.last() {
        pixels.pop();
    }
    pixels
}
