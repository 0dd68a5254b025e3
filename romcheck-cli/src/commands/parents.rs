use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::{TestOptions, resolve_parent_chain};

use crate::cli_types::CatalogArgs;
use crate::error::CliError;

use super::{load_settings, open_catalog, resolve_bios, resolve_root};

/// Print a game's ancestors, immediate parent first.
pub(crate) fn run_parents(
    catalog_args: CatalogArgs,
    bios: Option<PathBuf>,
    game: String,
    root: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = load_settings().rom_test;
    let catalog = open_catalog(&catalog_args, &settings)?;
    let root = resolve_root(None, root);
    let options = TestOptions::new().bios_dir(resolve_bios(bios, &settings));

    if !catalog.contains(&game) {
        log::warn!("'{}' is not in the catalog", game);
        return Ok(());
    }

    let chain = resolve_parent_chain(&catalog, &game, &root, &options);
    if chain.is_empty() {
        log::info!("{} has no parent or BIOS sets", game.if_supports_color(Stdout, |t| t.bold()));
        return Ok(());
    }

    log::info!("{}:", game.if_supports_color(Stdout, |t| t.bold()));
    for parent in &chain {
        let kind = if parent.is_bios { "bios  " } else { "parent" };
        let status = if parent.exist {
            "found".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "missing".if_supports_color(Stdout, |t| t.red()).to_string()
        };
        log::info!("  {} {} ({})", kind, parent.name, status);
    }
    Ok(())
}
