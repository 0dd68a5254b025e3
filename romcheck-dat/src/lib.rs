//! DAT catalog loading and parent/clone/BIOS chain resolution.

pub mod catalog;
pub mod dat;
pub mod error;
pub mod resolver;

pub use catalog::{Catalog, CatalogHeader};
pub use dat::{Dialect, DialectParseError, load_catalog, load_catalog_auto, parse_catalog};
pub use error::CatalogError;
pub use resolver::{DEFAULT_ARCHIVE_EXT, resolve_chain};
