//! Scanline polygon fill (even-odd rule).
//!
//! An edge from `(x1, y1)` to `(x2, y2)` meets scanline `y` only when
//! `min(y1, y2) <= y < max(y1, y2)`. Horizontal edges never contribute, and a
//! vertex shared by two edges is counted once, so every scanline sees an even
//! number of crossings.

use crate::error::{EngineError, Result};
use crate::geometry::Point;
use crate::raster::polyline_pixels;

fn require_vertices(vertices: &[Point]) -> Result<()> {
    if vertices.len() < 3 {
        return Err(EngineError::InsufficientVertices {
            count: vertices.len(),
        });
    }
    Ok(())
}

/// Sorted x-coordinates where scanline `y` crosses the polygon's edges.
pub fn scanline_intersections(vertices: &[Point], y: i32) -> Vec<f64> {
    let mut xs = Vec::new();
    let edges = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .take(vertices.len());

    for (a, b) in edges {
        if a.y == b.y {
            continue;
        }
        let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
        if y < lo || y >= hi {
            continue;
        }
        let x = a.x as f64
            + (y as f64 - a.y as f64) * (b.x as f64 - a.x as f64) / (b.y as f64 - a.y as f64);
        xs.push(x);
    }

    xs.sort_by(f64::total_cmp);
    xs
}

/// Pixels inside the polygon by the even-odd rule, scanline by scanline.
///
/// Spans run between crossings taken in pairs (1st–2nd, 3rd–4th, …) and
/// include every integer x in `[ceil(start), floor(end)]`.
pub fn interior_pixels(vertices: &[Point]) -> Result<Vec<Point>> {
    require_vertices(vertices)?;

    let min_y = vertices.iter().map(|p| p.y).min().unwrap_or_default();
    let max_y = vertices.iter().map(|p| p.y).max().unwrap_or_default();
    let mut pixels = Vec::new();

    for y in min_y..=max_y {
        let xs = scanline_intersections(vertices, y);
        for span in xs.chunks_exact(2) {
            let start = span[0].ceil() as i32;
            let end = span[1].floor() as i32;
            pixels.extend((start..=end).map(|x| Point::new(x, y)));
        }
    }

    Ok(pixels)
}

/// Boundary pixels of the closed polygon.
pub fn polygon_outline(vertices: &[Point]) -> Result<Vec<Point>> {
    require_vertices(vertices)?;
    Ok(polyline_pixels(vertices, true))
}

/// Interior plus boundary pixels, without duplicates.
pub fn fill_polygon(vertices: &[Point]) -> Result<Vec<Point>> {
    let mut pixels = polygon_outline(vertices)?;
    pixels.extend(interior_pixels(vertices)?);
    pixels.sort_unstable_by_key(|p| (p.y, p.x));
    pixels.dedup();
    Ok(pixels)
}
