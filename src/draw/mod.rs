//! Shape model, scene container and pixel rendering.
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Shape`]: the tagged shape variants (line, circle, bezier, character, polygon)
//! - [`Scene`]: ordered container for all shapes plus the clip window
//! - Rendering into a single [`PixelBatch`] per redraw, and a [`PixelBuffer`] sink

pub mod buffer;
pub mod color;
pub mod render;
pub mod scene;
pub mod shape;

pub use buffer::PixelBuffer;
pub use color::Color;
pub use render::{ColoredPixel, DisplaySink, PixelBatch, RenderStyle, rasterize_shape, render_scene};
pub use scene::{ClipSummary, ClipWindow, Scene};
pub use shape::{Shape, ShapeId, ShapeKind};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
