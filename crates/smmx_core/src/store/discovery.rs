//! Recursive discovery of archive files.

use super::StoreResult;
use crate::model::defaults::FILE_EXTENSION;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists `.smmx` files at or below `location`, sorted by path.
///
/// A location that is itself an archive file yields just that file; a
/// missing location yields an empty list. Unreadable directory entries are
/// skipped.
pub fn discover_mindmaps(location: &Path) -> StoreResult<Vec<PathBuf>> {
    if !location.exists() {
        return Ok(Vec::new());
    }
    if location.is_file() {
        return Ok(if has_archive_extension(location) {
            vec![location.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let mut files = WalkDir::new(location)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_archive_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    files.sort();

    debug!(
        "event=discover module=store status=ok files={}",
        files.len()
    );
    Ok(files)
}

fn has_archive_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
}
