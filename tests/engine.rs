use rasterlab::draw::{BLACK, BLUE, RED, WHITE};
use rasterlab::session::{self, SessionOptions};
use rasterlab::{
    DisplaySink, Engine, EngineError, EngineSettings, PixelBatch, PixelBuffer, Point, Selection,
    ShapeKind, Transform,
};
use std::collections::HashSet;

fn settings(width: u32, height: u32) -> EngineSettings {
    EngineSettings {
        width,
        height,
        ..EngineSettings::default()
    }
}

fn buffer_engine(width: u32, height: u32) -> Engine<PixelBuffer> {
    Engine::new(PixelBuffer::new(width, height, WHITE), settings(width, height))
}

#[derive(Default)]
struct Recorder {
    batches: Vec<PixelBatch>,
}

impl DisplaySink for Recorder {
    fn present(&mut self, batch: &PixelBatch, _width: u32, _height: u32) {
        self.batches.push(batch.clone());
    }
}

fn last_points(engine: &Engine<Recorder>) -> HashSet<Point> {
    engine
        .sink()
        .batches
        .last()
        .map(|batch| batch.pixels().iter().map(|p| Point::new(p.x, p.y)).collect())
        .unwrap_or_default()
}

#[test]
fn line_survives_save_and_reload_pixel_for_pixel() {
    let mut engine = Engine::new(Recorder::default(), settings(64, 64));
    engine.add_line(Point::new(0, 0), Point::new(5, 3));
    let before = engine.sink().batches[0].clone();
    assert_eq!(before.len(), 6);

    let json = engine.save_json().unwrap();
    let mut reloaded = Engine::new(Recorder::default(), settings(64, 64));
    reloaded.load_json(&json).unwrap();
    assert_eq!(reloaded.sink().batches[0], before);
}

#[test]
fn buffer_shows_shapes_and_drops_offscreen_pixels() {
    let mut engine = buffer_engine(32, 32);
    engine.add_shape_with_color(RED, ShapeKind::circle(Point::new(0, 0), 5));
    engine.add_shape_with_color(BLUE, ShapeKind::line(Point::new(10, 10), Point::new(20, 10)));

    let buffer = engine.sink();
    assert_eq!(buffer.get_pixel(5, 0), Some(RED));
    assert_eq!(buffer.get_pixel(15, 10), Some(BLUE));
    assert_eq!(buffer.get_pixel(15, 11), Some(WHITE));
    assert!(buffer.dropped() > 0);
}

#[test]
fn translate_round_trip_is_exact_for_every_kind() {
    let mut engine = Engine::new(Recorder::default(), settings(200, 200));
    engine.add_line(Point::new(3, 4), Point::new(50, 70));
    engine.add_circle(Point::new(100, 100), Point::new(110, 100));
    engine.add_bezier([
        Point::new(0, 0),
        Point::new(30, 60),
        Point::new(90, -20),
        Point::new(120, 40),
    ]);
    engine.add_character(Point::new(7, 9), 'C').unwrap();
    engine
        .add_polygon(vec![Point::new(0, 0), Point::new(40, 5), Point::new(20, 30)], true)
        .unwrap();
    let original = engine.scene().clone();

    engine.translate(17, -23, &Selection::All).unwrap();
    assert_ne!(engine.scene(), &original);
    engine.translate(-17, 23, &Selection::All).unwrap();
    assert_eq!(engine.scene(), &original);

    engine.scale(1.0, 1.0, &Selection::All).unwrap();
    assert_eq!(engine.scene(), &original);
}

#[test]
fn failed_transform_leaves_every_shape_untouched() {
    let mut engine = Engine::new(Recorder::default(), settings(200, 200));
    engine.add_line(Point::new(0, 0), Point::new(10, 10));
    engine.add_circle(Point::new(50, 50), Point::new(60, 50));
    let original = engine.scene().clone();
    let redraws = engine.redraw_count();

    let err = engine.scale(2.0, 0.5, &Selection::All).unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedTransform(_)));
    assert_eq!(engine.scene(), &original);
    assert_eq!(engine.redraw_count(), redraws);

    let err = engine
        .transform(
            &Transform::Translate {
                dx: i32::MAX,
                dy: 0,
            },
            &Selection::All,
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedTransform(_)));
    assert_eq!(engine.scene(), &original);
}

#[test]
fn clip_window_toggle_and_apply() {
    let mut engine = Engine::new(Recorder::default(), settings(100, 100));
    engine.add_line(Point::new(0, 20), Point::new(30, 26));
    engine.set_clip_window(Point::new(50, 40), Point::new(10, 10));

    let visible = last_points(&engine);
    assert!(!visible.contains(&Point::new(0, 20)));
    assert!(visible.contains(&Point::new(10, 22)));
    // Outline corner
    assert!(visible.contains(&Point::new(50, 40)));

    assert_eq!(engine.toggle_clip(), Some(false));
    assert!(last_points(&engine).contains(&Point::new(0, 20)));

    let summary = engine.apply_clip().unwrap();
    assert_eq!(summary.clipped, 1);
    assert_eq!(
        engine.scene().shapes()[0].kind,
        ShapeKind::line(Point::new(10, 22), Point::new(30, 26))
    );
}

#[test]
fn star_fill_leaves_centre_empty() {
    let mut engine = Engine::new(Recorder::default(), settings(100, 100));
    let star = vec![
        Point::new(50, 10),
        Point::new(74, 82),
        Point::new(12, 38),
        Point::new(88, 38),
        Point::new(26, 82),
    ];
    engine.add_polygon(star, false).unwrap();
    let outline = last_points(&engine);

    engine.toggle_last_polygon_fill().unwrap();
    let filled = last_points(&engine);
    assert!(filled.contains(&Point::new(50, 20)));
    assert!(!filled.contains(&Point::new(50, 50)));
    assert!(outline.is_subset(&filled));
}

#[test]
fn failed_load_keeps_existing_scene() {
    let mut engine = Engine::new(Recorder::default(), settings(64, 64));
    engine.add_line(Point::new(0, 0), Point::new(5, 3));
    let original = engine.scene().clone();

    let bad = r#"[
        {"type": "line", "points": [[0,0],[1,1]]},
        {"type": "character", "points": [[0,0]], "glyph": "Q"}
    ]"#;
    assert!(matches!(engine.load_json(bad), Err(EngineError::InvalidGlyph(_))));
    assert_eq!(engine.scene(), &original);
}

#[test]
fn file_round_trip_with_compression() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("nested").join("scene.json");
    let options = SessionOptions {
        compression: session::CompressionMode::On,
        ..SessionOptions::default()
    };

    let mut engine = buffer_engine(64, 64);
    engine.add_character(Point::new(4, 4), 'a').unwrap();
    engine
        .add_polygon(vec![Point::new(0, 0), Point::new(30, 0), Point::new(15, 20)], true)
        .unwrap();
    let report = engine.save_file(&path, &options).unwrap();
    assert!(report.compressed);

    let mut restored = buffer_engine(64, 64);
    assert_eq!(restored.load_file(&path, &options).unwrap(), 2);
    assert_eq!(restored.scene().shapes(), engine.scene().shapes());
    assert_eq!(restored.sink().get_pixel(4, 4), engine.sink().get_pixel(4, 4));
    assert_eq!(engine.settings().default_color, BLACK);
}
