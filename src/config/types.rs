//! Configuration type definitions.

use super::enums::{ColorSpec, PivotMode, SessionCompression};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canvas (display sink) settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Canvas width in pixels (valid range: 1 - 16384)
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Canvas height in pixels (valid range: 1 - 16384)
    #[serde(default = "default_canvas_height")]
    pub height: u32,

    /// Background color painted before every redraw
    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            background: default_background(),
        }
    }
}

/// Drawing-related settings.
///
/// Controls the defaults applied to newly added shapes.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default shape color - a named color (red, green, blue, yellow, orange, pink, white, black),
    /// a `#rrggbb` string, or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Pixel size of one glyph cell (valid range: 1 - 64)
    #[serde(default = "default_glyph_scale")]
    pub glyph_scale: u32,

    /// Upper bound on sample count per Bezier curve (valid range: 1 - 100000)
    #[serde(default = "default_bezier_max_steps")]
    pub bezier_max_steps: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            glyph_scale: default_glyph_scale(),
            bezier_max_steps: default_bezier_max_steps(),
        }
    }
}

/// Transform defaults.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TransformConfig {
    /// Pivot used by rotate/scale when none is given (canvas-center, centroid, origin)
    #[serde(default = "default_pivot")]
    pub pivot: PivotMode,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            pivot: default_pivot(),
        }
    }
}

/// Clip window display settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClipConfig {
    /// Draw the clip window rectangle while a window is set
    #[serde(default = "default_show_outline")]
    pub show_outline: bool,

    /// Color of the clip window outline
    #[serde(default = "default_outline_color")]
    pub outline_color: ColorSpec,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            show_outline: default_show_outline(),
            outline_color: default_outline_color(),
        }
    }
}

/// Scene file persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionConfig {
    /// Compression mode for saved scenes (auto, on, off)
    #[serde(default = "default_compress")]
    pub compress: SessionCompression,

    /// Payload size in KiB above which `auto` compresses
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Scene files larger than this are neither written nor loaded
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Keep the previous file as `<name>.bak` when overwriting (0 disables)
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            compress: default_compress(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            max_file_size_mb: default_max_file_size_mb(),
            backup_retention: default_backup_retention(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_background() -> ColorSpec {
    ColorSpec::named("white")
}

fn default_color() -> ColorSpec {
    ColorSpec::named("black")
}

fn default_glyph_scale() -> u32 {
    2
}

fn default_bezier_max_steps() -> u32 {
    crate::raster::DEFAULT_MAX_BEZIER_STEPS
}

fn default_pivot() -> PivotMode {
    PivotMode::CanvasCenter
}

fn default_show_outline() -> bool {
    true
}

fn default_outline_color() -> ColorSpec {
    ColorSpec::named("red")
}

fn default_compress() -> SessionCompression {
    SessionCompression::Auto
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_backup_retention() -> usize {
    1
}
