//! Pure rasterizers mapping geometric parameters to integer pixel coordinates.
//!
//! None of these functions touch a display or mutate shapes; they only
//! produce pixel sequences that the scene renderer batches up.

pub mod bezier;
pub mod circle;
pub mod glyph;
pub mod line;

pub use bezier::{bezier_pixels, bezier_samples, bezier_step_count, DEFAULT_MAX_BEZIER_STEPS};
pub use circle::{circle_pixels, MAX_CIRCLE_RADIUS};
pub use glyph::{Glyph, glyph_pixels, GLYPH_SIZE, MAX_GLYPH_SCALE};
pub use line::{LineIter, line_pixels, polyline_pixels};
