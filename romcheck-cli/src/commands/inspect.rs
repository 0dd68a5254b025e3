use std::path::PathBuf;

use romcheck_lib::{TestOptions, inspect_game};

use crate::cli_types::CatalogArgs;
use crate::error::CliError;

use super::{load_settings, open_catalog, resolve_bios};

/// Print the JSON detail view for one archive.
///
/// Parents are looked for under `--root`, or next to the archive.
pub(crate) fn run_inspect(
    catalog_args: CatalogArgs,
    bios: Option<PathBuf>,
    rom: PathBuf,
    root: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = load_settings().rom_test;
    let catalog = open_catalog(&catalog_args, &settings)?;

    if !rom.is_file() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{}: no such file", rom.display()),
        )));
    }
    let root = root
        .or_else(|| rom.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let options = TestOptions::new().bios_dir(resolve_bios(bios, &settings));

    let view = inspect_game(&catalog, &rom, &root, &options);
    // Machine-readable output bypasses the logger
    println!("{}", view.to_json()?);
    Ok(())
}
