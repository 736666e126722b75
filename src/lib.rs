//! Classical 2D raster engine.
//!
//! Shapes are stored as integer control points and turned into pixels by the
//! textbook algorithms: Bresenham lines, midpoint circles, sampled cubic
//! Bezier curves, 8×8 bitmap glyphs, even-odd scanline fill and
//! Cohen–Sutherland line clipping. Affine transforms rewrite control points.
//! A redraw produces one batch of colored pixels for a display sink.

pub mod clip;
pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod raster;
pub mod session;
pub mod transform;
pub mod util;

pub use config::Config;
pub use draw::{Color, DisplaySink, PixelBatch, PixelBuffer, Scene, Shape, ShapeId, ShapeKind};
pub use engine::{Engine, EngineSettings};
pub use error::{EngineError, Result};
pub use geometry::{Point, PointF, Rect};
pub use transform::{Pivot, Selection, Transform};
