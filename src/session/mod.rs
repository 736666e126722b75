//! Scene persistence.
//!
//! Converts the shape list into its JSON record format and writes it to disk
//! with locking, optional compression, and backup rotation. Loading detects
//! compression automatically and rejects the whole file on the first bad
//! record.

mod format;
mod options;
mod snapshot;
mod storage;

pub use format::{shapes_from_json, shapes_to_json};
pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, SessionOptions, backup_path_for,
    lock_path_for, options_from_config,
};
pub use snapshot::{LoadedScene, SaveReport, load_scene, save_scene};
pub use storage::{ClearOutcome, SceneInspection, ShapeCounts, clear_scene_files, inspect_scene};
