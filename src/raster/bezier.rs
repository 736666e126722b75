//! Cubic Bezier rasterization.

use super::line::polyline_pixels;
use crate::geometry::{Point, PointF};

/// Upper bound on parameter samples when the caller has no preference.
pub const DEFAULT_MAX_BEZIER_STEPS: u32 = 1000;

/// Picks the number of parameter steps for a curve.
///
/// One step per unit of control polygon length, clamped to `1..=max_steps`.
/// The control polygon bounds the curve length, so consecutive samples are
/// rarely more than a pixel apart; the line joins below cover the rest.
pub fn bezier_step_count(control: &[Point; 4], max_steps: u32) -> u32 {
    let length: f64 = control.windows(2).map(|pair| pair[0].distance(pair[1])).sum();
    let steps = length.ceil().min(u32::MAX as f64) as u32;
    steps.clamp(1, max_steps.max(1))
}

/// Evaluates the cubic at `steps + 1` evenly spaced parameters in `[0, 1]`.
///
/// Samples are rounded to the nearest pixel; the first and last samples are
/// exactly the end control points.
pub fn bezier_samples(control: &[Point; 4], steps: u32) -> Vec<Point> {
    let steps = steps.max(1);
    let [p0, p1, p2, p3] = control.map(Point::to_f64);

    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let mt = 1.0 - t;
            let a = mt * mt * mt;
            let b = 3.0 * mt * mt * t;
            let c = 3.0 * mt * t * t;
            let d = t * t * t;
            PointF::new(
                a * p0.x + b * p1.x + c * p2.x + d * p3.x,
                a * p0.y + b * p1.y + c * p2.y + d * p3.y,
            )
            .round()
        })
        .collect()
}

/// Rasterizes the curve as a connected pixel path.
///
/// Consecutive samples are joined with Bresenham segments so under-sampling
/// can never leave gaps.
pub fn bezier_pixels(control: &[Point; 4], max_steps: u32) -> Vec<Point> {
    let steps = bezier_step_count(control, max_steps);
    let mut samples = bezier_samples(control, steps);
    samples.dedup();
    polyline_pixels(&samples, false)
}
