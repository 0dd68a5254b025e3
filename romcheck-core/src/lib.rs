//! Shared data model for ROM set verification.
//!
//! Catalog definitions ([`GameDefinition`], [`RomDefinition`]), archive
//! header records ([`ArchiveEntry`]) and the tiered verification report
//! ([`Report`], [`FileResult`], [`SubRomResult`]) live here so the DAT
//! loader, the archive inspector and the frontends agree on one shape.

pub mod report;
pub mod rom;

pub use report::{
    FileResult, Issue, ParentInfo, Report, State, SubRomResult, Verdict, VerdictCounts, classify,
};
pub use rom::{
    ArchiveEntry, GameDefinition, RomDefinition, base_name, format_crc, normalize_crc,
    normalize_name,
};
