//! JSON scene format: an array of shape records.
//!
//! ```json
//! [
//!   {"type": "line", "id": 1, "color": "#000000", "points": [[0,0],[5,3]]},
//!   {"type": "character", "id": 2, "color": "#000000", "points": [[5,5]], "glyph": "A", "scale": 2}
//! ]
//! ```
//!
//! Loading is all or nothing: the first bad record aborts the whole load.

use crate::draw::{Color, Shape, ShapeId, ShapeKind};
use crate::error::{EngineError, Result};
use crate::geometry::Point;
use crate::raster::{Glyph, MAX_CIRCLE_RADIUS, MAX_GLYPH_SCALE};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize)]
struct ShapeRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(default)]
    points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<u32>,
    #[serde(default, alias = "char", skip_serializing_if = "Option::is_none")]
    glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filled: Option<bool>,
}

impl ShapeRecord {
    fn from_shape(shape: &Shape) -> Self {
        let mut record = ShapeRecord {
            kind: shape.kind.type_name().to_string(),
            id: Some(shape.id.0),
            color: Some(shape.color),
            points: shape.kind.control_points(),
            radius: None,
            glyph: None,
            scale: None,
            filled: None,
        };
        match &shape.kind {
            ShapeKind::Circle { radius, .. } => record.radius = Some(*radius),
            ShapeKind::Character { glyph, scale, .. } => {
                record.glyph = Some(glyph.to_string());
                record.scale = Some(*scale);
            }
            ShapeKind::Polygon { filled, .. } => record.filled = Some(*filled),
            ShapeKind::Line { .. } | ShapeKind::Bezier { .. } => {}
        }
        record
    }

    fn into_kind(self, index: usize) -> Result<ShapeKind> {
        let points = self.points;
        let count = points.len();
        let wrong_count = |expected: &str| {
            EngineError::malformed(
                index,
                format!("{} needs {} point(s), got {}", self.kind, expected, count),
            )
        };

        match self.kind.as_str() {
            "line" => match points[..] {
                [start, end] => Ok(ShapeKind::line(start, end)),
                _ => Err(wrong_count("2")),
            },
            "circle" => match (&points[..], self.radius) {
                ([_], Some(radius)) if radius > MAX_CIRCLE_RADIUS => Err(EngineError::malformed(
                    index,
                    format!("circle radius {} exceeds {}", radius, MAX_CIRCLE_RADIUS),
                )),
                ([center], Some(radius)) => Ok(ShapeKind::circle(*center, radius)),
                ([center, edge], None) => Ok(ShapeKind::circle_through(*center, *edge)),
                ([_], None) => Err(EngineError::malformed(index, "circle is missing its radius")),
                _ => Err(wrong_count("1 (with radius) or 2")),
            },
            "bezier" => {
                let control: [Point; 4] = points.try_into().map_err(|_| wrong_count("4"))?;
                Ok(ShapeKind::bezier(control))
            }
            "character" | "char" => {
                let [anchor] = points[..] else {
                    return Err(wrong_count("1"));
                };
                let glyph_id = self
                    .glyph
                    .ok_or_else(|| EngineError::malformed(index, "character is missing its glyph"))?;
                let glyph: Glyph = glyph_id.parse()?;
                let scale = match self.scale {
                    None => 1,
                    Some(scale @ 1..=MAX_GLYPH_SCALE) => scale,
                    Some(scale) => {
                        return Err(EngineError::malformed(
                            index,
                            format!("glyph scale {} outside 1-{}", scale, MAX_GLYPH_SCALE),
                        ));
                    }
                };
                Ok(ShapeKind::Character { anchor, glyph, scale })
            }
            "polygon" => {
                if count < 3 {
                    return Err(wrong_count("at least 3"));
                }
                Ok(ShapeKind::polygon(points, self.filled.unwrap_or(false)))
            }
            other => Err(EngineError::UnknownShapeType(other.to_string())),
        }
    }
}

/// Serializes shapes in scene order as a pretty-printed JSON array.
pub fn shapes_to_json(shapes: &[Shape]) -> Result<String> {
    let records: Vec<ShapeRecord> = shapes.iter().map(ShapeRecord::from_shape).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parses a JSON array of shape records.
///
/// Records without an `id` get fresh identifiers above the largest id in the
/// file; running out of identifiers is a `MalformedShape` error. A missing
/// `color` defaults to black.
pub fn shapes_from_json(json: &str) -> Result<Vec<Shape>> {
    let values: Vec<Value> = serde_json::from_str(json)?;

    let mut parsed = Vec::with_capacity(values.len());
    let mut seen = HashSet::new();
    for (index, value) in values.into_iter().enumerate() {
        let (id, color, kind) = parse_record(index, value)?;
        if let Some(id) = id {
            if !seen.insert(id) {
                return Err(EngineError::malformed(index, format!("duplicate id {}", id)));
            }
        }
        parsed.push((id, color, kind));
    }

    let mut next_id = seen.iter().copied().max().unwrap_or(0);
    let mut shapes = Vec::with_capacity(parsed.len());
    for (index, (id, color, kind)) in parsed.into_iter().enumerate() {
        let id = match id {
            Some(id) => id,
            None => {
                next_id = next_id
                    .checked_add(1)
                    .ok_or_else(|| EngineError::malformed(index, "no shape id left to assign"))?;
                next_id
            }
        };
        shapes.push(Shape::new(ShapeId(id), color, kind));
    }

    debug!("parsed {} shape record(s)", shapes.len());
    Ok(shapes)
}

fn parse_record(index: usize, value: Value) -> Result<(Option<u64>, Color, ShapeKind)> {
    let kind = value
        .as_object()
        .ok_or_else(|| EngineError::malformed(index, "record is not an object"))?
        .get("type")
        .ok_or_else(|| EngineError::malformed(index, "missing \"type\""))?
        .as_str()
        .ok_or_else(|| EngineError::malformed(index, "\"type\" must be a string"))?;

    if !matches!(kind, "line" | "circle" | "bezier" | "character" | "char" | "polygon") {
        return Err(EngineError::UnknownShapeType(kind.to_string()));
    }

    let record: ShapeRecord =
        serde_json::from_value(value).map_err(|err| EngineError::malformed(index, err.to_string()))?;
    let id = record.id;
    let color = record.color.unwrap_or_default();
    Ok((id, color, record.into_kind(index)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLACK, RED};
    use crate::raster::line_pixels;

    fn sample_scene() -> Vec<Shape> {
        vec![
            Shape::new(ShapeId(1), BLACK, ShapeKind::line(Point::new(0, 0), Point::new(5, 3))),
            Shape::new(ShapeId(2), RED, ShapeKind::circle(Point::new(50, 50), 10)),
            Shape::new(
                ShapeId(3),
                BLACK,
                ShapeKind::bezier([
                    Point::new(0, 0),
                    Point::new(10, 20),
                    Point::new(30, 20),
                    Point::new(40, 0),
                ]),
            ),
            Shape::new(
                ShapeId(4),
                BLACK,
                ShapeKind::character(Point::new(5, 5), 'b', 3).unwrap(),
            ),
            Shape::new(
                ShapeId(7),
                RED,
                ShapeKind::polygon(vec![Point::new(0, 0), Point::new(10, 0), Point::new(5, 8)], true),
            ),
        ]
    }

    #[test]
    fn scene_survives_save_and_load() {
        let shapes = sample_scene();
        let json = shapes_to_json(&shapes).unwrap();
        assert_eq!(shapes_from_json(&json).unwrap(), shapes);
    }

    #[test]
    fn loaded_line_rasterizes_identically() {
        let json = r##"[{"type": "line", "color": "#000000", "points": [[0,0],[5,3]]}]"##;
        let shapes = shapes_from_json(json).unwrap();
        let ShapeKind::Line { start, end } = shapes[0].kind else {
            panic!("expected a line");
        };
        assert_eq!(
            line_pixels(start, end),
            line_pixels(Point::new(0, 0), Point::new(5, 3))
        );
    }

    #[test]
    fn record_layout_matches_format() {
        let json = shapes_to_json(&sample_scene()[3..4]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "type": "character",
                "id": 4,
                "color": "#000000",
                "points": [[5, 5]],
                "glyph": "B",
                "scale": 3
            }])
        );
    }

    #[test]
    fn unknown_type_is_reported() {
        let err = shapes_from_json(r#"[{"type": "spline", "points": []}]"#).unwrap_err();
        assert!(matches!(err, EngineError::UnknownShapeType(ref t) if t == "spline"));
    }

    #[test]
    fn wrong_point_count_is_malformed() {
        let err = shapes_from_json(r#"[{"type": "bezier", "points": [[0,0],[1,1],[2,2]]}]"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedShape { index: 0, .. }));

        let err = shapes_from_json(
            r#"[{"type": "line", "points": [[0,0],[1,1]]}, {"type": "polygon", "points": [[0,0],[1,1]]}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::MalformedShape { index: 1, .. }));
    }

    #[test]
    fn bad_glyph_and_bad_json_map_to_their_errors() {
        let err = shapes_from_json(r#"[{"type": "character", "points": [[0,0]], "glyph": "Z"}]"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidGlyph(_)));

        assert!(matches!(shapes_from_json("not json"), Err(EngineError::Parse(_))));
        assert!(matches!(shapes_from_json(r#"{"type": "line"}"#), Err(EngineError::Parse(_))));
        assert!(matches!(
            shapes_from_json(r#"[{"points": [[0,0],[1,1]]}]"#),
            Err(EngineError::MalformedShape { .. })
        ));
    }

    #[test]
    fn legacy_records_are_accepted() {
        let json = r#"[
            {"type": "circle", "points": [[0,0],[3,4]]},
            {"type": "char", "points": [[1,2]], "glyph": "c"},
            {"type": "line", "id": 9, "points": [[0,0],[1,1]]}
        ]"#;
        let shapes = shapes_from_json(json).unwrap();
        assert_eq!(shapes[0].kind, ShapeKind::circle(Point::new(0, 0), 5));
        assert_eq!(shapes[1].kind, ShapeKind::character(Point::new(1, 2), 'C', 1).unwrap());
        assert_eq!(shapes[0].color, BLACK);
        let ids: Vec<u64> = shapes.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![10, 11, 9]);
    }

    #[test]
    fn duplicate_ids_and_zero_scale_are_rejected() {
        let json = r#"[
            {"type": "line", "id": 1, "points": [[0,0],[1,1]]},
            {"type": "line", "id": 1, "points": [[0,0],[2,2]]}
        ]"#;
        assert!(matches!(
            shapes_from_json(json),
            Err(EngineError::MalformedShape { index: 1, .. })
        ));

        let json = r#"[{"type": "character", "points": [[0,0]], "glyph": "A", "scale": 0}]"#;
        assert!(matches!(
            shapes_from_json(json),
            Err(EngineError::MalformedShape { .. })
        ));
    }

    #[test]
    fn char_records_with_char_key_load() {
        let json = r##"[{"type": "char", "points": [[10, 20]], "char": "A", "scale": 2, "color": "#000000"}]"##;
        let shapes = shapes_from_json(json).unwrap();
        assert_eq!(
            shapes[0].kind,
            ShapeKind::character(Point::new(10, 20), 'A', 2).unwrap()
        );

        let saved: Value = serde_json::from_str(&shapes_to_json(&shapes).unwrap()).unwrap();
        assert_eq!(saved[0]["glyph"], "A");
        assert!(saved[0].get("char").is_none());
    }

    #[test]
    fn oversized_scale_and_radius_are_rejected() {
        let json = r#"[{"type": "character", "points": [[0,0]], "glyph": "A", "scale": 1000000}]"#;
        assert!(matches!(
            shapes_from_json(json),
            Err(EngineError::MalformedShape { index: 0, .. })
        ));

        let json = r#"[
            {"type": "line", "points": [[0,0],[1,1]]},
            {"type": "circle", "points": [[0,0]], "radius": 4294967295}
        ]"#;
        assert!(matches!(
            shapes_from_json(json),
            Err(EngineError::MalformedShape { index: 1, .. })
        ));

        let json = r#"[{"type": "character", "points": [[0,0]], "glyph": "A", "scale": 64}]"#;
        assert!(shapes_from_json(json).is_ok());
    }

    #[test]
    fn exhausted_ids_fail_instead_of_wrapping() {
        let json = r#"[
            {"type": "line", "id": 18446744073709551615, "points": [[0,0],[1,1]]},
            {"type": "line", "points": [[0,0],[2,2]]}
        ]"#;
        assert!(matches!(
            shapes_from_json(json),
            Err(EngineError::MalformedShape { index: 1, .. })
        ));
    }
}
