use super::options::{backup_path_for, lock_path_for};
use super::snapshot;
use crate::draw::{Color, Shape, ShapeKind};
use crate::geometry::Rect;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use fs2::FileExt;
use log::warn;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Result of clearing on-disk scene data.
#[derive(Debug, Clone, Copy)]
pub struct ClearOutcome {
    pub removed_scene: bool,
    pub removed_backup: bool,
    pub removed_lock: bool,
}

/// Summary information about a scene file and its backup.
#[derive(Debug, Clone)]
pub struct SceneInspection {
    pub scene_path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<DateTime<Local>>,
    pub backup_path: PathBuf,
    pub backup_exists: bool,
    pub backup_size_bytes: Option<u64>,
    pub shape_counts: Option<ShapeCounts>,
    pub bounds: Option<Rect>,
    /// Distinct shape colors in first-use order.
    pub colors: Vec<Color>,
    pub compressed: bool,
}

/// Shape counts per kind stored in a scene file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeCounts {
    pub lines: usize,
    pub circles: usize,
    pub beziers: usize,
    pub characters: usize,
    pub polygons: usize,
    pub filled_polygons: usize,
}

impl ShapeCounts {
    pub fn tally(shapes: &[Shape]) -> Self {
        let mut counts = ShapeCounts::default();
        for shape in shapes {
            match &shape.kind {
                ShapeKind::Line { .. } => counts.lines += 1,
                ShapeKind::Circle { .. } => counts.circles += 1,
                ShapeKind::Bezier { .. } => counts.beziers += 1,
                ShapeKind::Character { .. } => counts.characters += 1,
                ShapeKind::Polygon { filled, .. } => {
                    counts.polygons += 1;
                    if *filled {
                        counts.filled_polygons += 1;
                    }
                }
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.lines + self.circles + self.beziers + self.characters + self.polygons
    }
}

/// Remove a scene file together with its backup and lock file.
pub fn clear_scene_files(scene_path: &Path) -> Result<ClearOutcome> {
    Ok(ClearOutcome {
        removed_scene: remove_file_if_exists(scene_path)?,
        removed_backup: remove_file_if_exists(&backup_path_for(scene_path))?,
        removed_lock: remove_file_if_exists(&lock_path_for(scene_path))?,
    })
}

/// Inspect a scene file for CLI reporting.
pub fn inspect_scene(scene_path: &Path) -> Result<SceneInspection> {
    let metadata = fs::metadata(scene_path).ok();
    let exists = metadata.is_some();
    let size_bytes = metadata.as_ref().map(|m| m.len());
    let modified = metadata
        .as_ref()
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Local>::from);

    let backup_path = backup_path_for(scene_path);
    let backup_meta = fs::metadata(&backup_path).ok();

    let mut shape_counts = None;
    let mut bounds = None;
    let mut colors: Vec<Color> = Vec::new();
    let mut compressed = false;

    if exists {
        let lock_path = lock_path_for(scene_path);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open scene lock file {}", lock_path.display()))?;
        FileExt::lock_shared(&lock_file)
            .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

        let loaded = snapshot::load_scene_inner(scene_path);

        FileExt::unlock(&lock_file).unwrap_or_else(|err| {
            warn!("failed to unlock scene file {}: {}", lock_path.display(), err)
        });

        let loaded = loaded?;
        shape_counts = Some(ShapeCounts::tally(&loaded.shapes));
        bounds = loaded
            .shapes
            .iter()
            .filter_map(Shape::bounding_box)
            .reduce(Rect::union);
        for shape in &loaded.shapes {
            if !colors.contains(&shape.color) {
                colors.push(shape.color);
            }
        }
        compressed = loaded.compressed;
    }

    Ok(SceneInspection {
        scene_path: scene_path.to_path_buf(),
        exists,
        size_bytes,
        modified,
        backup_exists: backup_meta.is_some(),
        backup_size_bytes: backup_meta.as_ref().map(|m| m.len()),
        backup_path,
        shape_counts,
        bounds,
        colors,
        compressed,
    })
}

fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
        Ok(true)
    } else {
        Ok(false)
    }
}
