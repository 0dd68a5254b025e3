//! ROM set verification engine.
//!
//! Lists archive entries from their headers, matches them against catalog
//! definitions and builds a tiered report for a whole directory tree.

pub mod archive;
pub mod error;
pub mod inspect;
pub mod matcher;
pub mod scanner;
pub mod settings;
pub mod tester;

pub use archive::{ArchiveInspector, ArchiveKind, SevenZipInspector, ZipInspector, list_entries};
pub use error::{ArchiveError, TestError};
pub use inspect::{DatSubRom, GameInspection, inspect_game};
pub use matcher::{match_game, match_rom};
pub use settings::{RomTestSettings, Settings, load_settings, settings_path};
pub use tester::{
    NOT_IN_CATALOG, TestOptions, TestProgress, resolve_parent_chain, test_directory,
    test_directory_with_progress, test_file,
};

// Re-export the data model and catalog API so frontends need only this crate.
pub use romcheck_core::*;
pub use romcheck_dat::{
    Catalog, CatalogError, Dialect, load_catalog, load_catalog_auto, resolve_chain,
};
