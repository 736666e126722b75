//! Affine transforms over shape control points.
//!
//! Each call computes the new control points of every selected shape in
//! floating point, rounds them once to integers, and only then writes them
//! back. Any failure leaves all shapes untouched.
//!
//! Repeated rotations accumulate rounding error because control points are
//! stored as integers. Translations are exact.

use crate::draw::{Shape, ShapeId, ShapeKind};
use crate::error::{EngineError, Result};
use crate::geometry::{Point, PointF};
use crate::raster::MAX_CIRCLE_RADIUS;
use log::debug;

/// Fixed point that rotations and scales are applied about.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pivot {
    /// Coordinate origin `(0, 0)`.
    Origin,
    /// An explicit point, typically the canvas centre.
    At(PointF),
    /// Mean of all control points of the selected shapes.
    Centroid,
}

/// An affine transform request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    Translate { dx: i32, dy: i32 },
    /// Rotation by `degrees` with the standard rotation matrix. With y
    /// pointing down, positive angles turn clockwise on screen.
    Rotate { degrees: f64, pivot: Pivot },
    /// Per-axis scale of each point's offset from the pivot.
    Scale { sx: f64, sy: f64, pivot: Pivot },
}

/// Which shapes a transform applies to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Ids(Vec<ShapeId>),
}

impl Selection {
    pub fn includes(&self, id: ShapeId) -> bool {
        match self {
            Selection::All => true,
            Selection::Ids(ids) => ids.contains(&id),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Translate { dx: i32, dy: i32 },
    Rotate { cos: f64, sin: f64, pivot: PointF },
    Scale { sx: f64, sy: f64, pivot: PointF },
}

/// Applies `transform` to every selected shape, all or nothing.
///
/// Returns the number of shapes that were transformed.
pub fn apply_transform(
    shapes: &mut [Shape],
    transform: &Transform,
    selection: &Selection,
) -> Result<usize> {
    validate(transform)?;

    let targets: Vec<usize> = shapes
        .iter()
        .enumerate()
        .filter(|(_, shape)| selection.includes(shape.id))
        .map(|(index, _)| index)
        .collect();

    let op = resolve(transform, &targets, shapes);

    let mut staged = Vec::with_capacity(targets.len());
    for &index in &targets {
        let shape = &shapes[index];
        let kind = transform_kind(&shape.kind, op).map_err(|err| {
            debug!("transform rejected by shape {}: {}", shape.id, err);
            err
        })?;
        staged.push((index, kind));
    }

    let count = staged.len();
    for (index, kind) in staged {
        shapes[index].kind = kind;
    }
    debug!("applied {:?} to {} shape(s)", transform, count);
    Ok(count)
}

fn validate(transform: &Transform) -> Result<()> {
    let finite = match *transform {
        Transform::Translate { .. } => true,
        Transform::Rotate { degrees, pivot } => degrees.is_finite() && pivot_is_finite(pivot),
        Transform::Scale { sx, sy, pivot } => {
            sx.is_finite() && sy.is_finite() && pivot_is_finite(pivot)
        }
    };
    if finite {
        Ok(())
    } else {
        Err(EngineError::UnsupportedTransform(
            "transform parameters must be finite".to_string(),
        ))
    }
}

fn pivot_is_finite(pivot: Pivot) -> bool {
    match pivot {
        Pivot::At(point) => point.is_finite(),
        Pivot::Origin | Pivot::Centroid => true,
    }
}

fn resolve(transform: &Transform, targets: &[usize], shapes: &[Shape]) -> Op {
    match *transform {
        Transform::Translate { dx, dy } => Op::Translate { dx, dy },
        Transform::Rotate { degrees, pivot } => {
            let radians = degrees.to_radians();
            Op::Rotate {
                cos: radians.cos(),
                sin: radians.sin(),
                pivot: resolve_pivot(pivot, targets, shapes),
            }
        }
        Transform::Scale { sx, sy, pivot } => Op::Scale {
            sx,
            sy,
            pivot: resolve_pivot(pivot, targets, shapes),
        },
    }
}

fn resolve_pivot(pivot: Pivot, targets: &[usize], shapes: &[Shape]) -> PointF {
    match pivot {
        Pivot::Origin => PointF::new(0.0, 0.0),
        Pivot::At(point) => point,
        Pivot::Centroid => centroid(targets.iter().flat_map(|&i| shapes[i].kind.control_points())),
    }
}

/// Mean of the given points, or the origin when there are none.
pub fn centroid(points: impl IntoIterator<Item = Point>) -> PointF {
    let (mut sum_x, mut sum_y, mut count) = (0.0, 0.0, 0usize);
    for point in points {
        sum_x += point.x as f64;
        sum_y += point.y as f64;
        count += 1;
    }
    if count == 0 {
        PointF::new(0.0, 0.0)
    } else {
        PointF::new(sum_x / count as f64, sum_y / count as f64)
    }
}

fn transform_kind(kind: &ShapeKind, op: Op) -> Result<ShapeKind> {
    let map = |point: Point| map_point(point, op);
    Ok(match kind {
        ShapeKind::Line { start, end } => ShapeKind::Line {
            start: map(*start)?,
            end: map(*end)?,
        },
        ShapeKind::Circle { center, radius } => ShapeKind::Circle {
            center: map(*center)?,
            radius: scale_radius(*radius, op)?,
        },
        ShapeKind::Bezier { control } => {
            let mut mapped = *control;
            for point in mapped.iter_mut() {
                *point = map(*point)?;
            }
            ShapeKind::Bezier { control: mapped }
        }
        ShapeKind::Character {
            anchor,
            glyph,
            scale,
        } => ShapeKind::Character {
            anchor: map(*anchor)?,
            glyph: *glyph,
            scale: *scale,
        },
        ShapeKind::Polygon { points, filled } => ShapeKind::Polygon {
            points: points.iter().map(|p| map(*p)).collect::<Result<_>>()?,
            filled: *filled,
        },
    })
}

fn scale_radius(radius: u32, op: Op) -> Result<u32> {
    match op {
        Op::Scale { sx, sy, .. } => {
            if sx != sy {
                return Err(EngineError::UnsupportedTransform(format!(
                    "non-uniform scale ({sx}, {sy}) would turn a circle into an ellipse"
                )));
            }
            let scaled = (radius as f64 * sx.abs()).round();
            if scaled > MAX_CIRCLE_RADIUS as f64 {
                return Err(EngineError::UnsupportedTransform(format!(
                    "scaled radius {scaled} exceeds {MAX_CIRCLE_RADIUS}"
                )));
            }
            Ok(scaled as u32)
        }
        Op::Translate { .. } | Op::Rotate { .. } => Ok(radius),
    }
}

fn map_point(point: Point, op: Op) -> Result<Point> {
    let mapped = match op {
        Op::Translate { dx, dy } => return point.checked_offset(dx, dy).ok_or_else(out_of_range),
        Op::Rotate { cos, sin, pivot } => {
            let x = point.x as f64 - pivot.x;
            let y = point.y as f64 - pivot.y;
            PointF::new(pivot.x + x * cos - y * sin, pivot.y + x * sin + y * cos)
        }
        Op::Scale { sx, sy, pivot } => PointF::new(
            pivot.x + (point.x as f64 - pivot.x) * sx,
            pivot.y + (point.y as f64 - pivot.y) * sy,
        ),
    };
    round_checked(mapped)
}

fn round_checked(point: PointF) -> Result<Point> {
    let range = i32::MIN as f64..=i32::MAX as f64;
    let (x, y) = (point.x.round(), point.y.round());
    if range.contains(&x) && range.contains(&y) {
        Ok(Point::new(x as i32, y as i32))
    } else {
        Err(out_of_range())
    }
}

fn out_of_range() -> EngineError {
    EngineError::UnsupportedTransform("resulting coordinates exceed the integer range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::BLACK;

    fn shape(id: u64, kind: ShapeKind) -> Shape {
        Shape::new(ShapeId(id), BLACK, kind)
    }

    fn sample() -> Vec<Shape> {
        vec![
            shape(1, ShapeKind::line(Point::new(0, 0), Point::new(10, 5))),
            shape(2, ShapeKind::circle(Point::new(20, 20), 7)),
            shape(
                3,
                ShapeKind::bezier([
                    Point::new(0, 0),
                    Point::new(5, 10),
                    Point::new(15, 10),
                    Point::new(20, 0),
                ]),
            ),
            shape(4, ShapeKind::character(Point::new(3, 4), 'B', 2).unwrap()),
            shape(
                5,
                ShapeKind::polygon(vec![Point::new(0, 0), Point::new(8, 0), Point::new(4, 6)], true),
            ),
        ]
    }

    #[test]
    fn translate_then_inverse_is_exact() {
        let original = sample();
        let mut shapes = original.clone();
        apply_transform(&mut shapes, &Transform::Translate { dx: 37, dy: -12 }, &Selection::All)
            .unwrap();
        assert_ne!(shapes, original);
        apply_transform(&mut shapes, &Transform::Translate { dx: -37, dy: 12 }, &Selection::All)
            .unwrap();
        assert_eq!(shapes, original);
    }

    #[test]
    fn unit_scale_is_identity() {
        let original = sample();
        let mut shapes = original.clone();
        for pivot in [Pivot::Origin, Pivot::Centroid, Pivot::At(PointF::new(400.0, 300.0))] {
            apply_transform(
                &mut shapes,
                &Transform::Scale {
                    sx: 1.0,
                    sy: 1.0,
                    pivot,
                },
                &Selection::All,
            )
            .unwrap();
            assert_eq!(shapes, original);
        }
    }

    #[test]
    fn rotate_quarter_turn_about_pivot() {
        let mut shapes = vec![shape(1, ShapeKind::line(Point::new(10, 0), Point::new(20, 0)))];
        apply_transform(
            &mut shapes,
            &Transform::Rotate {
                degrees: 90.0,
                pivot: Pivot::Origin,
            },
            &Selection::All,
        )
        .unwrap();
        assert_eq!(
            shapes[0].kind,
            ShapeKind::line(Point::new(0, 10), Point::new(0, 20))
        );
    }

    #[test]
    fn rotation_keeps_circle_radius() {
        let mut shapes = vec![shape(1, ShapeKind::circle(Point::new(10, 0), 4))];
        apply_transform(
            &mut shapes,
            &Transform::Rotate {
                degrees: 180.0,
                pivot: Pivot::Origin,
            },
            &Selection::All,
        )
        .unwrap();
        assert_eq!(shapes[0].kind, ShapeKind::circle(Point::new(-10, 0), 4));
    }

    #[test]
    fn uniform_scale_scales_circle_radius() {
        let mut shapes = vec![shape(1, ShapeKind::circle(Point::new(10, 10), 5))];
        apply_transform(
            &mut shapes,
            &Transform::Scale {
                sx: -2.0,
                sy: -2.0,
                pivot: Pivot::Origin,
            },
            &Selection::All,
        )
        .unwrap();
        assert_eq!(shapes[0].kind, ShapeKind::circle(Point::new(-20, -20), 10));
    }

    #[test]
    fn circle_radius_cannot_grow_past_limit() {
        let original = vec![shape(1, ShapeKind::circle(Point::new(0, 0), MAX_CIRCLE_RADIUS / 2 + 1))];
        let mut shapes = original.clone();
        let err = apply_transform(
            &mut shapes,
            &Transform::Scale {
                sx: 2.0,
                sy: 2.0,
                pivot: Pivot::Origin,
            },
            &Selection::All,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedTransform(_)));
        assert_eq!(shapes, original);
    }

    #[test]
    fn zero_scale_collapses_line_to_pivot() {
        let mut shapes = vec![shape(1, ShapeKind::line(Point::new(3, 4), Point::new(9, 1)))];
        apply_transform(
            &mut shapes,
            &Transform::Scale {
                sx: 0.0,
                sy: 0.0,
                pivot: Pivot::At(PointF::new(5.0, 5.0)),
            },
            &Selection::All,
        )
        .unwrap();
        assert_eq!(
            shapes[0].kind,
            ShapeKind::line(Point::new(5, 5), Point::new(5, 5))
        );
    }

    #[test]
    fn non_uniform_circle_scale_is_atomic_failure() {
        let original = sample();
        let mut shapes = original.clone();
        let err = apply_transform(
            &mut shapes,
            &Transform::Scale {
                sx: 2.0,
                sy: 1.0,
                pivot: Pivot::Origin,
            },
            &Selection::All,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedTransform(_)));
        assert_eq!(shapes, original);
    }

    #[test]
    fn selection_limits_targets() {
        let original = sample();
        let mut shapes = original.clone();
        let count = apply_transform(
            &mut shapes,
            &Transform::Scale {
                sx: 2.0,
                sy: 1.0,
                pivot: Pivot::Origin,
            },
            &Selection::Ids(vec![ShapeId(1), ShapeId(5), ShapeId(99)]),
        )
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(shapes[0].kind, ShapeKind::line(Point::new(0, 0), Point::new(20, 5)));
        assert_eq!(shapes[1], original[1]);
    }

    #[test]
    fn centroid_pivot_uses_selected_control_points() {
        let mut shapes = vec![shape(1, ShapeKind::line(Point::new(0, 0), Point::new(10, 0)))];
        apply_transform(
            &mut shapes,
            &Transform::Rotate {
                degrees: 90.0,
                pivot: Pivot::Centroid,
            },
            &Selection::All,
        )
        .unwrap();
        assert_eq!(
            shapes[0].kind,
            ShapeKind::line(Point::new(5, -5), Point::new(5, 5))
        );
    }

    #[test]
    fn rejects_non_finite_and_overflowing_transforms() {
        let original = sample();
        let mut shapes = original.clone();
        assert!(
            apply_transform(
                &mut shapes,
                &Transform::Rotate {
                    degrees: f64::NAN,
                    pivot: Pivot::Origin
                },
                &Selection::All
            )
            .is_err()
        );
        assert!(
            apply_transform(
                &mut shapes,
                &Transform::Translate {
                    dx: i32::MAX,
                    dy: 0
                },
                &Selection::All
            )
            .is_err()
        );
        assert_eq!(shapes, original);
    }
}
