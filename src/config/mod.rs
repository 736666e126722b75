//! Configuration file support for rasterlab.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/rasterlab/config.toml`. Settings include the canvas size,
//! drawing defaults, the default transform pivot, clip window display and scene file
//! persistence.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{ColorSpec, PivotMode, SessionCompression};
pub use types::{CanvasConfig, ClipConfig, DrawingConfig, SessionConfig, TransformConfig};

use crate::raster::MAX_GLYPH_SCALE;
use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 800
/// height = 600
/// background = "white"
///
/// [drawing]
/// default_color = "black"
/// glyph_scale = 2
///
/// [transform]
/// pivot = "canvas-center"
///
/// [session]
/// compress = "auto"
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Canvas extent and background
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Defaults for new shapes and rasterization limits
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Transform defaults
    #[serde(default)]
    pub transform: TransformConfig,

    /// Clip window display
    #[serde(default)]
    pub clip: ClipConfig,

    /// Scene file persistence
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width`, `canvas.height`: 1 - 16384
    /// - `drawing.glyph_scale`: 1 - 64
    /// - `drawing.bezier_max_steps`: 1 - 100000
    /// - `session.max_file_size_mb`, `session.auto_compress_threshold_kb`: at least 1
    fn validate_and_clamp(&mut self) {
        if !(1..=16384).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 1-16384 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(1, 16384);
        }

        if !(1..=16384).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 1-16384 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(1, 16384);
        }

        if !(1..=MAX_GLYPH_SCALE).contains(&self.drawing.glyph_scale) {
            log::warn!(
                "Invalid glyph_scale {}, clamping to 1-{} range",
                self.drawing.glyph_scale,
                MAX_GLYPH_SCALE
            );
            self.drawing.glyph_scale = self.drawing.glyph_scale.clamp(1, MAX_GLYPH_SCALE);
        }

        if !(1..=100_000).contains(&self.drawing.bezier_max_steps) {
            log::warn!(
                "Invalid bezier_max_steps {}, clamping to 1-100000 range",
                self.drawing.bezier_max_steps
            );
            self.drawing.bezier_max_steps = self.drawing.bezier_max_steps.clamp(1, 100_000);
        }

        if self.session.max_file_size_mb == 0 {
            log::warn!("Invalid session max_file_size_mb 0, using 1");
            self.session.max_file_size_mb = 1;
        }

        if self.session.auto_compress_threshold_kb == 0 {
            log::warn!("Invalid session auto_compress_threshold_kb 0, using 1");
            self.session.auto_compress_threshold_kb = 1;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/rasterlab/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("rasterlab");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is missing.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes the documented example config (`config.example.toml`) to `config_path`.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path or it
    /// cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLACK, RED, WHITE};

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!((config.canvas.width, config.canvas.height), (800, 600));
        assert_eq!(config.canvas.background.to_color(), WHITE);
        assert_eq!(config.drawing.default_color.to_color(), BLACK);
        assert_eq!(config.drawing.glyph_scale, 2);
        assert_eq!(config.drawing.bezier_max_steps, 1000);
        assert_eq!(config.transform.pivot, PivotMode::CanvasCenter);
        assert_eq!(config.clip.outline_color.to_color(), RED);
        assert_eq!(config.session.compress, SessionCompression::Auto);
    }

    #[test]
    fn partial_file_keeps_defaults_and_clamps() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[canvas]\nwidth = 0\n\n[drawing]\nglyph_scale = 500\ndefault_color = [0, 0, 255]\n\n[transform]\npivot = \"centroid\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.canvas.width, 1);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.drawing.glyph_scale, 64);
        assert_eq!(config.drawing.default_color, ColorSpec::Rgb([0, 0, 255]));
        assert_eq!(config.transform.pivot, PivotMode::Centroid);
    }

    #[test]
    fn missing_file_yields_defaults_and_bad_toml_errors() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.canvas.width, 800);

        let bad = temp.path().join("bad.toml");
        fs::write(&bad, "[canvas\nwidth = ").unwrap();
        assert!(Config::load_from(&bad).is_err());
    }

    #[test]
    fn example_file_parses() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        Config::create_default_file(&path).unwrap();
        assert!(Config::create_default_file(&path).is_err());
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.canvas.width, 800);
    }

    #[test]
    fn save_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        let mut config = Config::default();
        config.drawing.glyph_scale = 4;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().drawing.glyph_scale, 4);
    }

    #[test]
    fn schema_mentions_sections() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        assert!(schema.contains("canvas"));
        assert!(schema.contains("session"));
    }
}
