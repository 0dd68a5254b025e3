//! Archive entry listing from container headers.
//!
//! Only central-directory (zip) or header (7z) metadata is read. Entry
//! bodies are never decompressed, so the stored CRC is trusted as the
//! entry's checksum: an archive whose header was corrupted along with its
//! payload will not be caught here.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use romcheck_core::{ArchiveEntry, format_crc};

use crate::error::ArchiveError;

/// Something that can list the entries of an archive file.
pub trait ArchiveInspector {
    fn list_entries(&self, path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError>;
}

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    Zip,
    SevenZip,
}

impl ArchiveKind {
    /// Detect the container format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "zip" => Some(Self::Zip),
            "7z" => Some(Self::SevenZip),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::SevenZip => "7z",
        }
    }

    pub fn inspector(&self) -> &'static dyn ArchiveInspector {
        match self {
            Self::Zip => &ZipInspector,
            Self::SevenZip => &SevenZipInspector,
        }
    }
}

/// List an archive's entries, choosing the backend by extension.
pub fn list_entries(path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let kind = ArchiveKind::from_path(path)
        .ok_or_else(|| ArchiveError::unsupported(path.display().to_string()))?;
    let entries = kind.inspector().list_entries(path)?;
    log::debug!("{}: {} entries", path.display(), entries.len());
    Ok(entries)
}

/// Zip backend: reads the central directory without inflating entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipInspector;

impl ArchiveInspector for ZipInspector {
    fn list_entries(&self, path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            if entry.is_dir() {
                continue;
            }
            entries.push(ArchiveEntry {
                name: entry.name().to_string(),
                size: entry.size(),
                crc: format_crc(entry.crc32()),
            });
        }
        Ok(entries)
    }
}

/// 7z backend: reads the archive header only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SevenZipInspector;

impl ArchiveInspector for SevenZipInspector {
    fn list_entries(&self, path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        let archive = sevenz_rust::Archive::read(&mut file, len, &[])?;

        Ok(archive
            .files
            .iter()
            .filter(|entry| !entry.is_directory)
            .map(|entry| ArchiveEntry {
                name: entry.name.clone(),
                size: entry.size,
                // No stored CRC: report zero so the entry fails the CRC check
                crc: format_crc(if entry.has_crc { entry.crc as u32 } else { 0 }),
            })
            .collect())
    }
}
