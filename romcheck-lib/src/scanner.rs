//! Directory walk for ROM archives.
//!
//! Recurses below the ROM root and returns every file whose extension is in
//! the allowed set, sorted by file name within each directory so repeated
//! runs see the same order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::TestError;

/// Build a lower-cased extension set. A leading dot is optional.
pub fn extension_set<S: AsRef<str>>(extensions: &[S]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Check if a path has an extension in the allowed set.
pub fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

/// Collect archive files under `root`, in walk order.
///
/// The root itself must be readable. Unreadable subdirectories or entries
/// below it are logged and skipped.
pub fn scan_archives(root: &Path, extensions: &HashSet<String>) -> Result<Vec<PathBuf>, TestError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping unreadable path: {e}");
                continue;
            }
        };
        if entry.file_type().is_file() && has_matching_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    log::debug!("Found {} archives under {}", files.len(), root.display());
    Ok(files)
}

/// Catalog game name for an archive: its file name without extension.
pub fn game_name_for(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}
