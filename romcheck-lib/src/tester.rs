//! ROM test orchestration.
//!
//! Walks a ROM directory, looks each archive up in the catalog by its base
//! name, resolves and checks its parent/BIOS chain, lists the archive's
//! entries and matches them against the game's declared ROMs.
//!
//! Only an unreadable ROM root or cancellation aborts a run. Lookup misses
//! and unreadable archives are recorded on their [`FileResult`] and the walk
//! continues.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use romcheck_core::{FileResult, ParentInfo, Report, SubRomResult};
use romcheck_dat::{Catalog, DEFAULT_ARCHIVE_EXT, resolve_chain};

use crate::archive::list_entries;
use crate::error::TestError;
use crate::matcher::match_rom;
use crate::scanner::{extension_set, game_name_for, scan_archives};

/// Note recorded on files whose base name is not a catalog game.
pub const NOT_IN_CATALOG: &str = "not in catalog";

/// Extensions tested when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["zip", "7z"];

/// Options for a ROM test run.
#[derive(Debug, Clone)]
pub struct TestOptions {
    /// Directory holding BIOS sets. When unset, BIOS archives are looked
    /// for next to the other parents.
    pub bios_dir: Option<PathBuf>,

    /// Allowed archive extensions, lower-cased without the dot.
    pub extensions: HashSet<String>,

    /// Extension assumed for ancestors when no archive is being tested.
    pub parent_ext: String,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            bios_dir: None,
            extensions: extension_set(DEFAULT_EXTENSIONS),
            parent_ext: DEFAULT_ARCHIVE_EXT.to_string(),
        }
    }
}

impl TestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bios_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.bios_dir = dir;
        self
    }

    /// Replace the allowed extensions. An empty list keeps the defaults.
    pub fn extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        let set = extension_set(extensions);
        if !set.is_empty() {
            self.extensions = set;
        }
        self
    }

    pub fn parent_ext(mut self, ext: impl Into<String>) -> Self {
        self.parent_ext = ext.into().trim_start_matches('.').to_lowercase();
        self
    }
}

/// Progress events emitted during a directory test.
#[derive(Debug, Clone)]
pub enum TestProgress {
    /// Directory walk finished
    Scanned { file_count: usize },
    /// About to test one archive
    Testing {
        file_name: String,
        file_index: usize,
        total: usize,
    },
    Done,
}

/// Test every archive under `root` against the catalog.
pub fn test_directory(
    catalog: &Catalog,
    root: &Path,
    options: &TestOptions,
    cancel: &AtomicBool,
) -> Result<Report, TestError> {
    test_directory_with_progress(catalog, root, options, cancel, &|_| {})
}

/// Like [`test_directory`], reporting progress as it goes.
///
/// `cancel` is checked before each archive. Once it is set the run stops
/// with [`TestError::Cancelled`] and results gathered so far are dropped.
pub fn test_directory_with_progress(
    catalog: &Catalog,
    root: &Path,
    options: &TestOptions,
    cancel: &AtomicBool,
    progress: &dyn Fn(TestProgress),
) -> Result<Report, TestError> {
    let files = scan_archives(root, &options.extensions)?;
    progress(TestProgress::Scanned {
        file_count: files.len(),
    });

    let mut report = Report::default();
    for (i, path) in files.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            log::debug!("ROM test cancelled after {} of {} files", i, files.len());
            return Err(TestError::Cancelled);
        }
        progress(TestProgress::Testing {
            file_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("?")
                .to_string(),
            file_index: i,
            total: files.len(),
        });
        report.list.push(test_file(catalog, path, root, options));
    }

    progress(TestProgress::Done);
    Ok(report)
}

/// Test a single archive.
///
/// Every declared ROM ends up in exactly one list of the result: green with
/// an "ok" message when it verified, otherwise one entry per issue found.
pub fn test_file(catalog: &Catalog, path: &Path, root: &Path, options: &TestOptions) -> FileResult {
    let mut result = FileResult::new(path);

    let Some(game) = game_name_for(path).and_then(|name| catalog.get(name)) else {
        log::debug!("{}: {}", path.display(), NOT_IN_CATALOG);
        result.note = Some(NOT_IN_CATALOG.to_string());
        return result;
    };
    result.game = Some(game.name.clone());

    // Ancestors are most likely stored in the same container format as the clone
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    result.parent_list = resolve_chain(catalog, &game.name, &options.parent_ext);
    mark_existing(
        &mut result.parent_list,
        ext.as_deref(),
        path.parent(),
        root,
        options,
    );

    let entries = match list_entries(path) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {}", path.display(), e);
            result.archive_error = true;
            result.note = Some(e.to_string());
            return result;
        }
    };

    for rom in &game.roms {
        let issues = match_rom(rom, &entries);
        if issues.is_empty() {
            result.push(SubRomResult::ok(rom.clone()));
        } else {
            for sub in issues {
                result.push(sub);
            }
        }
    }

    log::debug!(
        "{}: {} red, {} yellow, {} green",
        path.display(),
        result.red.len(),
        result.yellow.len(),
        result.green.len()
    );
    result
}

/// Resolve a game's parent chain and check which ancestors exist on disk.
///
/// Ancestors are looked for under `root` (BIOS sets under the BIOS directory
/// when one is configured) with any of the allowed extensions.
pub fn resolve_parent_chain(
    catalog: &Catalog,
    game_base_name: &str,
    root: &Path,
    options: &TestOptions,
) -> Vec<ParentInfo> {
    let mut chain = resolve_chain(catalog, game_base_name, &options.parent_ext);
    mark_existing(&mut chain, None, None, root, options);
    chain
}

/// Extensions to try for an ancestor, most likely first: the tested
/// archive's own, then the parent default, then the rest in sorted order.
fn ancestor_extensions(preferred: Option<&str>, options: &TestOptions) -> Vec<String> {
    let mut rest: Vec<&String> = options.extensions.iter().collect();
    rest.sort();

    let mut exts: Vec<String> = Vec::with_capacity(rest.len() + 2);
    let leading = preferred.into_iter().chain([default_parent_ext(options)]);
    for ext in leading.chain(rest.into_iter().map(String::as_str)) {
        if !ext.is_empty() && !exts.iter().any(|e| e == ext) {
            exts.push(ext.to_string());
        }
    }
    exts
}

fn default_parent_ext(options: &TestOptions) -> &str {
    if options.parent_ext.is_empty() {
        DEFAULT_ARCHIVE_EXT
    } else {
        options.parent_ext.as_str()
    }
}

/// Check each ancestor on disk, renaming it to the archive actually found.
/// Ancestors that are not found keep the parent-extension name.
fn mark_existing(
    chain: &mut [ParentInfo],
    preferred_ext: Option<&str>,
    archive_dir: Option<&Path>,
    root: &Path,
    options: &TestOptions,
) {
    let exts = ancestor_extensions(preferred_ext, options);
    let default_suffix = format!(".{}", default_parent_ext(options));

    for parent in chain {
        let stem = parent
            .name
            .strip_suffix(&default_suffix)
            .unwrap_or(&parent.name)
            .to_string();
        let dirs: Vec<&Path> = match options.bios_dir.as_deref() {
            Some(bios_dir) if parent.is_bios => vec![bios_dir],
            _ => std::iter::once(root).chain(archive_dir).collect(),
        };

        let found = exts.iter().find_map(|ext| {
            let file_name = format!("{stem}.{ext}");
            dirs.iter()
                .any(|dir| dir.join(&file_name).is_file())
                .then_some(file_name)
        });
        parent.exist = found.is_some();
        if let Some(file_name) = found {
            parent.name = file_name;
        }
    }
}
