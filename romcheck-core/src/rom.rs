use serde::{Deserialize, Serialize};

/// A single ROM declared by a catalog game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomDefinition {
    pub name: String,
    /// Name this ROM goes by when merged into a parent set (empty if none)
    pub merge_name: String,
    pub size: u64,
    /// CRC32 checksum (lowercase, 8 hex digits)
    pub crc: String,
}

impl RomDefinition {
    /// Create a ROM definition. The CRC is normalized when it is valid hex and
    /// kept lower-cased verbatim otherwise (it will then never match).
    pub fn new(name: impl Into<String>, size: u64, crc: &str) -> Self {
        Self {
            name: name.into(),
            merge_name: String::new(),
            size,
            crc: normalize_crc(crc).unwrap_or_else(|| crc.trim().to_lowercase()),
        }
    }

    pub fn with_merge_name(mut self, merge_name: impl Into<String>) -> Self {
        self.merge_name = merge_name.into();
        self
    }

    pub fn has_merge_name(&self) -> bool {
        !self.merge_name.is_empty()
    }
}

/// A game (or machine) definition from a DAT catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDefinition {
    pub name: String,
    /// Game this one is a clone or BIOS child of (empty if none)
    pub parent: String,
    pub is_bios: bool,
    /// ROMs in the order the catalog declares them
    pub roms: Vec<RomDefinition>,
}

impl GameDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: String::new(),
            is_bios: false,
            roms: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn bios(mut self, is_bios: bool) -> Self {
        self.is_bios = is_bios;
        self
    }

    pub fn with_rom(mut self, rom: RomDefinition) -> Self {
        self.roms.push(rom);
        self
    }

    pub fn has_parent(&self) -> bool {
        !self.parent.is_empty()
    }
}

/// One file record read from an archive header.
///
/// Size and CRC come from the container's own metadata; entry bodies are
/// never decompressed to recompute them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Path inside the archive, possibly with subdirectories
    pub name: String,
    pub size: u64,
    /// CRC32 from the header (lowercase, 8 hex digits)
    pub crc: String,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, size: u64, crc: u32) -> Self {
        Self {
            name: name.into(),
            size,
            crc: format_crc(crc),
        }
    }

    /// Last path segment of the entry name.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }
}

/// Catalog lookup key for a game name: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize a CRC32 string to 8 lowercase hex digits.
///
/// Accepts an optional `0x` prefix and short values (zero-padded).
/// Returns `None` for empty, over-long or non-hex input.
pub fn normalize_crc(crc: &str) -> Option<String> {
    let trimmed = crc.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 8 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("{:0>8}", digits.to_lowercase()))
}

/// Format a raw CRC32 value the way catalogs store it.
pub fn format_crc(value: u32) -> String {
    format!("{value:08x}")
}

/// Last segment of an archive path, accepting both `/` and `\` separators.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
