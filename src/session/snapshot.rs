use super::format::{shapes_from_json, shapes_to_json};
use super::options::{SessionOptions, backup_path_for, lock_path_for};
use crate::draw::Shape;
use anyhow::{Context, Result, bail};
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Shapes read back from a scene file.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub shapes: Vec<Shape>,
    pub compressed: bool,
}

/// What [`save_scene`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub bytes: u64,
    pub compressed: bool,
    pub rotated_backup: bool,
}

/// Persist `shapes` to `path` according to the configured options.
///
/// The payload goes to a temporary sibling first and replaces the target by
/// rename. The previous file is kept as `<path>.bak` when backups are enabled.
pub fn save_scene(path: &Path, shapes: &[Shape], options: &SessionOptions) -> Result<SaveReport> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create scene directory {}", parent.display()))?;
    }

    let lock_path = lock_path_for(path);
    let lock_file = open_lock_file(&lock_path)?;
    FileExt::lock_exclusive(&lock_file)
        .with_context(|| format!("failed to lock scene file {}", lock_path.display()))?;

    let result = save_scene_inner(path, shapes, options);

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!("failed to unlock scene file {}: {}", lock_path.display(), err)
    });

    result
}

fn save_scene_inner(path: &Path, shapes: &[Shape], options: &SessionOptions) -> Result<SaveReport> {
    let mut bytes = shapes_to_json(shapes)
        .context("failed to serialise scene")?
        .into_bytes();

    if bytes.len() as u64 > options.max_file_size_bytes {
        bail!(
            "scene data size {} bytes exceeds the configured limit of {} bytes",
            bytes.len(),
            options.max_file_size_bytes
        );
    }

    let compressed = options.should_compress(bytes.len() as u64);
    if compressed {
        bytes = compress_bytes(&bytes)?;
    }

    let tmp_path = temp_path(path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| format!("failed to open temporary scene file {}", tmp_path.display()))?;
        tmp_file
            .write_all(&bytes)
            .context("failed to write scene payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary scene file")?;
    }

    let mut rotated_backup = false;
    if path.exists() && options.backup_retention > 0 {
        let backup_path = backup_path_for(path);
        if backup_path.exists() {
            fs::remove_file(&backup_path).ok();
        }
        fs::rename(path, &backup_path).with_context(|| {
            format!(
                "failed to rotate previous scene file {} -> {}",
                path.display(),
                backup_path.display()
            )
        })?;
        rotated_backup = true;
    }

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to move temporary scene file {} -> {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    info!(
        "Scene saved to {} ({} shapes, {} bytes, compression={})",
        path.display(),
        shapes.len(),
        bytes.len(),
        compressed
    );

    Ok(SaveReport {
        bytes: bytes.len() as u64,
        compressed,
        rotated_backup,
    })
}

/// Load a scene file, transparently handling gzip.
///
/// Files larger than the configured limit are refused without being read.
pub fn load_scene(path: &Path, options: &SessionOptions) -> Result<LoadedScene> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to stat scene file {}", path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "Scene file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        bail!(
            "scene file {} exceeds the size limit of {} bytes",
            path.display(),
            options.max_file_size_bytes
        );
    }

    let lock_path = lock_path_for(path);
    let lock_file = open_lock_file(&lock_path)?;
    FileExt::lock_shared(&lock_file)
        .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

    let result = load_scene_inner(path);

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!("failed to unlock scene file {}: {}", lock_path.display(), err)
    });

    result
}

pub(crate) fn load_scene_inner(path: &Path) -> Result<LoadedScene> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(path)
            .with_context(|| format!("failed to open scene file {}", path.display()))?;
        file.read_to_end(&mut file_bytes)
            .context("failed to read scene file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let decompressed = if compressed {
        let mut decoder = GzDecoder::new(&file_bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("failed to decompress scene file")?;
        out
    } else {
        file_bytes
    };

    let text = String::from_utf8(decompressed).context("scene file is not valid UTF-8")?;
    let shapes = shapes_from_json(&text)
        .with_context(|| format!("failed to load scene {}", path.display()))?;

    debug!(
        "Loaded {} shapes from {} (compressed={})",
        shapes.len(),
        path.display(),
        compressed
    );

    Ok(LoadedScene { shapes, compressed })
}

fn open_lock_file(lock_path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("failed to open scene lock file {}", lock_path.display()))
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress scene payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed scene payload")
}

pub(crate) fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}
