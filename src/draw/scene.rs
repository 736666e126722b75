//! Scene container: the ordered shape list plus the clip window.

use super::color::Color;
use super::shape::{Shape, ShapeId, ShapeKind};
use crate::clip::{ClipResult, clip_line};
use crate::error::Result;
use crate::geometry::Rect;
use crate::transform::{Selection, Transform, apply_transform};
use log::debug;
use std::collections::HashSet;

/// Clip rectangle and whether rendering currently applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    pub rect: Rect,
    pub active: bool,
}

/// Counts reported by [`Scene::apply_clip`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipSummary {
    pub unchanged: usize,
    pub clipped: usize,
    pub removed: usize,
}

/// Owns every shape in draw order (first = bottom layer, last = top layer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    shapes: Vec<Shape>,
    clip: Option<ClipWindow>,
    next_id: u64,
}

impl Scene {
    /// Creates a new empty scene with no clip window.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    /// Adds a new shape on top of existing shapes and returns its identifier.
    pub fn add(&mut self, color: Color, kind: ShapeKind) -> ShapeId {
        let id = self.allocate_id();
        self.shapes.push(Shape::new(id, color, kind));
        id
    }

    /// Removes the shape with `id`, if present.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|shape| shape.id == id)?;
        Some(self.shapes.remove(index))
    }

    /// Removes all shapes and the clip window.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.clip = None;
    }

    /// Replaces the whole shape list, e.g. after loading a file.
    ///
    /// Identifiers already present are kept; id allocation continues above
    /// the largest one.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.next_id = shapes.iter().map(|shape| shape.id.0).max().unwrap_or(0);
        self.shapes = shapes;
    }

    fn allocate_id(&mut self) -> ShapeId {
        if let Some(id) = self.next_id.checked_add(1) {
            self.next_id = id;
            return ShapeId(id);
        }
        // Counter exhausted: hand out the lowest unused id instead.
        let used: HashSet<u64> = self.shapes.iter().map(|shape| shape.id.0).collect();
        ShapeId((1..).find(|id| !used.contains(id)).unwrap_or_default())
    }

    /// Axis-aligned box covering every shape, if any has bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .filter_map(Shape::bounding_box)
            .reduce(Rect::union)
    }

    // ------------------------------------------------------------------
    // Clip window
    // ------------------------------------------------------------------

    pub fn clip_window(&self) -> Option<ClipWindow> {
        self.clip
    }

    /// Rectangle applied during rendering, when the window is active.
    pub fn active_clip(&self) -> Option<Rect> {
        self.clip.filter(|window| window.active).map(|window| window.rect)
    }

    /// Sets (and activates) the clip window.
    pub fn set_clip_window(&mut self, rect: Rect) {
        self.clip = Some(ClipWindow { rect, active: true });
    }

    pub fn clear_clip_window(&mut self) {
        self.clip = None;
    }

    /// Flips the clip window between active and inactive.
    ///
    /// Returns the new state, or `None` when no window is set.
    pub fn toggle_clip(&mut self) -> Option<bool> {
        let window = self.clip.as_mut()?;
        window.active = !window.active;
        Some(window.active)
    }

    /// Permanently clips every Line shape against the clip window.
    ///
    /// Lines are replaced by their visible sub-segment or removed when fully
    /// outside. Other shapes are left alone. Returns `None` without a window.
    pub fn apply_clip(&mut self) -> Option<ClipSummary> {
        let rect = self.clip?.rect;
        let mut summary = ClipSummary::default();

        self.shapes.retain_mut(|shape| {
            let ShapeKind::Line { start, end } = &mut shape.kind else {
                return true;
            };
            match clip_line(*start, *end, &rect) {
                ClipResult::Unchanged => {
                    summary.unchanged += 1;
                    true
                }
                ClipResult::Clipped(a, b) => {
                    *start = a;
                    *end = b;
                    summary.clipped += 1;
                    true
                }
                ClipResult::Rejected => {
                    summary.removed += 1;
                    false
                }
            }
        });

        debug!("applied clip window {:?}: {:?}", rect, summary);
        Some(summary)
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Toggles the `filled` flag of the polygon with `id`.
    ///
    /// Returns the new flag, or `None` if `id` is not a polygon.
    pub fn toggle_fill(&mut self, id: ShapeId) -> Option<bool> {
        let shape = self.shapes.iter_mut().find(|shape| shape.id == id)?;
        match &mut shape.kind {
            ShapeKind::Polygon { filled, .. } => {
                *filled = !*filled;
                Some(*filled)
            }
            _ => None,
        }
    }

    /// Toggles the fill of the most recently added polygon.
    pub fn toggle_last_polygon_fill(&mut self) -> Option<(ShapeId, bool)> {
        let id = self.shapes.iter().rev().find(|shape| shape.is_polygon())?.id;
        self.toggle_fill(id).map(|filled| (id, filled))
    }

    /// Applies an affine transform to the selected shapes, all or nothing.
    pub fn transform(&mut self, transform: &Transform, selection: &Selection) -> Result<usize> {
        apply_transform(&mut self.shapes, transform, selection)
    }
}
