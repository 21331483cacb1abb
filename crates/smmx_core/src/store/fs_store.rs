//! Archive store backed by the local file system.

use super::discovery::discover_mindmaps;
use super::{StoreError, StoreResult};
use crate::codec::{decode, encode};
use crate::model::defaults::FILE_EXTENSION;
use crate::model::document::MindMap;
use log::{error, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::Builder;

/// Persistence contract used by the mind map service.
pub trait MindMapStore {
    /// Loads and decodes one archive.
    fn load(&self, path: &Path) -> StoreResult<MindMap>;
    /// Encodes and publishes one archive, replacing any previous file.
    fn save(&self, map: &MindMap, path: &Path) -> StoreResult<()>;
    /// Publishes a text export.
    fn write_text(&self, path: &Path, text: &str) -> StoreResult<()>;
    /// Lists archive files at or below `location`.
    fn discover(&self, location: &Path) -> StoreResult<Vec<PathBuf>>;
}

/// [`MindMapStore`] over plain files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMindMapStore;

impl FsMindMapStore {
    pub fn new() -> Self {
        Self
    }
}

impl MindMapStore for FsMindMapStore {
    fn load(&self, path: &Path) -> StoreResult<MindMap> {
        let started_at = Instant::now();
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }
        ensure_archive_extension(path)?;

        let bytes = fs::read(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match decode(&bytes) {
            Ok(map) => {
                info!(
                    "event=archive_read module=store status=ok duration_ms={} bytes={} nodes={}",
                    started_at.elapsed().as_millis(),
                    bytes.len(),
                    map.len()
                );
                Ok(map)
            }
            Err(err) => {
                error!(
                    "event=archive_read module=store status=error duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    err.kind()
                );
                Err(err.into())
            }
        }
    }

    fn save(&self, map: &MindMap, path: &Path) -> StoreResult<()> {
        let started_at = Instant::now();
        ensure_archive_extension(path)?;

        let bytes = encode(map)?;
        match publish(path, &bytes) {
            Ok(()) => {
                info!(
                    "event=archive_write module=store status=ok duration_ms={} bytes={} nodes={}",
                    started_at.elapsed().as_millis(),
                    bytes.len(),
                    map.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=archive_write module=store status=error duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    err.kind()
                );
                Err(err)
            }
        }
    }

    fn write_text(&self, path: &Path, text: &str) -> StoreResult<()> {
        publish(path, text.as_bytes())?;
        info!(
            "event=export_write module=store status=ok bytes={}",
            text.len()
        );
        Ok(())
    }

    fn discover(&self, location: &Path) -> StoreResult<Vec<PathBuf>> {
        discover_mindmaps(location)
    }
}

fn ensure_archive_extension(path: &Path) -> StoreResult<()> {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION));
    if matches {
        Ok(())
    } else {
        Err(StoreError::UnsupportedExtension(path.to_path_buf()))
    }
}

/// Writes `bytes` to a sibling temp file, then renames it over `path`.
fn publish(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let io_error = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = Builder::new()
        .prefix(".smmx-")
        .suffix(".tmp")
        .tempfile_in(directory)
        .map_err(io_error)?;
    staged.write_all(bytes).map_err(io_error)?;
    if let Ok(existing) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(io_error)?;
    }
    staged.as_file().sync_all().map_err(io_error)?;
    staged.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}
