//! Orchestration layer: owns the scene and the display sink.
//!
//! Every successful mutation re-renders the whole scene and hands exactly one
//! [`PixelBatch`](crate::draw::PixelBatch) to the sink. A failed operation
//! leaves the scene as it was and does not redraw.

use crate::config::{Config, PivotMode};
use crate::draw::{
    ClipSummary, Color, DisplaySink, RenderStyle, Scene, ShapeId, ShapeKind, render_scene,
};
use crate::error::{EngineError, Result};
use crate::geometry::{Point, PointF, Rect};
use crate::session::{self, LoadedScene, SaveReport, SessionOptions};
use crate::transform::{Pivot, Selection, Transform};
use log::{debug, info};
use std::path::Path;

/// Engine-wide settings, usually derived from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub width: u32,
    pub height: u32,
    pub style: RenderStyle,
    pub default_color: Color,
    pub glyph_scale: u32,
    pub pivot: PivotMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            width: config.canvas.width,
            height: config.canvas.height,
            style: RenderStyle {
                clip_outline: config
                    .clip
                    .show_outline
                    .then(|| config.clip.outline_color.to_color()),
                bezier_max_steps: config.drawing.bezier_max_steps,
            },
            default_color: config.drawing.default_color.to_color(),
            glyph_scale: config.drawing.glyph_scale,
            pivot: config.transform.pivot,
        }
    }

    /// Pivot used by rotate and scale requests that do not name one.
    pub fn default_pivot(&self) -> Pivot {
        match self.pivot {
            PivotMode::CanvasCenter => Pivot::At(PointF::new(
                self.width as f64 / 2.0,
                self.height as f64 / 2.0,
            )),
            PivotMode::Centroid => Pivot::Centroid,
            PivotMode::Origin => Pivot::Origin,
        }
    }
}

/// Scene plus display sink.
pub struct Engine<S: DisplaySink> {
    scene: Scene,
    sink: S,
    settings: EngineSettings,
    redraws: usize,
}

impl<S: DisplaySink> Engine<S> {
    pub fn new(sink: S, settings: EngineSettings) -> Self {
        Self {
            scene: Scene::new(),
            sink,
            settings,
            redraws: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Number of batches handed to the sink so far.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Renders the scene and presents it as a single batch.
    pub fn redraw(&mut self) {
        let batch = render_scene(&self.scene, &self.settings.style);
        self.sink
            .present(&batch, self.settings.width, self.settings.height);
        self.redraws += 1;
        debug!("redraw #{} presented {} pixel(s)", self.redraws, batch.len());
    }

    // ------------------------------------------------------------------
    // Shape construction
    // ------------------------------------------------------------------

    /// Adds a shape in the default color.
    pub fn add_shape(&mut self, kind: ShapeKind) -> ShapeId {
        self.add_shape_with_color(self.settings.default_color, kind)
    }

    pub fn add_shape_with_color(&mut self, color: Color, kind: ShapeKind) -> ShapeId {
        let id = self.scene.add(color, kind);
        self.redraw();
        id
    }

    pub fn add_line(&mut self, start: Point, end: Point) -> ShapeId {
        self.add_shape(ShapeKind::line(start, end))
    }

    /// Circle centred on `center` passing through `edge`.
    pub fn add_circle(&mut self, center: Point, edge: Point) -> ShapeId {
        self.add_shape(ShapeKind::circle_through(center, edge))
    }

    pub fn add_bezier(&mut self, control: [Point; 4]) -> ShapeId {
        self.add_shape(ShapeKind::bezier(control))
    }

    /// Glyph at `anchor` using the configured glyph scale.
    pub fn add_character(&mut self, anchor: Point, glyph_id: char) -> Result<ShapeId> {
        let kind = ShapeKind::character(anchor, glyph_id, self.settings.glyph_scale)?;
        Ok(self.add_shape(kind))
    }

    /// Finished polygon; fewer than three vertices is rejected.
    pub fn add_polygon(&mut self, points: Vec<Point>, filled: bool) -> Result<ShapeId> {
        if points.len() < 3 {
            return Err(EngineError::InsufficientVertices {
                count: points.len(),
            });
        }
        Ok(self.add_shape(ShapeKind::polygon(points, filled)))
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Applies a transform to the selected shapes, all or nothing.
    pub fn transform(&mut self, transform: &Transform, selection: &Selection) -> Result<usize> {
        let count = self.scene.transform(transform, selection)?;
        self.redraw();
        Ok(count)
    }

    pub fn translate(&mut self, dx: i32, dy: i32, selection: &Selection) -> Result<usize> {
        self.transform(&Transform::Translate { dx, dy }, selection)
    }

    /// Rotates about the configured default pivot.
    pub fn rotate(&mut self, degrees: f64, selection: &Selection) -> Result<usize> {
        let pivot = self.settings.default_pivot();
        self.transform(&Transform::Rotate { degrees, pivot }, selection)
    }

    /// Scales about the configured default pivot.
    pub fn scale(&mut self, sx: f64, sy: f64, selection: &Selection) -> Result<usize> {
        let pivot = self.settings.default_pivot();
        self.transform(&Transform::Scale { sx, sy, pivot }, selection)
    }

    /// Sets and activates the clip window from two opposite corners.
    pub fn set_clip_window(&mut self, a: Point, b: Point) {
        self.scene.set_clip_window(Rect::from_corners(a, b));
        self.redraw();
    }

    /// Flips the clip window on or off; `None` when no window is set.
    pub fn toggle_clip(&mut self) -> Option<bool> {
        let active = self.scene.toggle_clip()?;
        self.redraw();
        Some(active)
    }

    pub fn clear_clip_window(&mut self) {
        self.scene.clear_clip_window();
        self.redraw();
    }

    /// Permanently clips all lines against the clip window.
    pub fn apply_clip(&mut self) -> Option<ClipSummary> {
        let summary = self.scene.apply_clip()?;
        self.redraw();
        Some(summary)
    }

    pub fn toggle_fill(&mut self, id: ShapeId) -> Option<bool> {
        let filled = self.scene.toggle_fill(id)?;
        self.redraw();
        Some(filled)
    }

    pub fn toggle_last_polygon_fill(&mut self) -> Option<(ShapeId, bool)> {
        let toggled = self.scene.toggle_last_polygon_fill()?;
        self.redraw();
        Some(toggled)
    }

    /// Removes every shape and the clip window.
    pub fn clear(&mut self) {
        self.scene.clear();
        self.redraw();
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn save_json(&self) -> Result<String> {
        session::shapes_to_json(self.scene.shapes())
    }

    /// Replaces all shapes with those parsed from `json`.
    ///
    /// On error the current shapes are kept.
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let shapes = session::shapes_from_json(json)?;
        let count = shapes.len();
        self.scene.replace_shapes(shapes);
        self.redraw();
        Ok(count)
    }

    pub fn save_file(&self, path: &Path, options: &SessionOptions) -> anyhow::Result<SaveReport> {
        session::save_scene(path, self.scene.shapes(), options)
    }

    pub fn load_file(&mut self, path: &Path, options: &SessionOptions) -> anyhow::Result<usize> {
        let LoadedScene { shapes, compressed } = session::load_scene(path, options)?;
        let count = shapes.len();
        self.scene.replace_shapes(shapes);
        self.redraw();
        info!(
            "Loaded {} shape(s) from {} (compressed={})",
            count,
            path.display(),
            compressed
        );
        Ok(count)
    }
}
