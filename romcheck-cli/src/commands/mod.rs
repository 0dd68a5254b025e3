pub(crate) mod config;
pub(crate) mod inspect;
pub(crate) mod parents;

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::{Catalog, Dialect, RomTestSettings, Settings, load_catalog, load_catalog_auto};

use crate::cli_types::CatalogArgs;
use crate::error::CliError;

/// Settings file contents, or defaults with a warning if it is unreadable.
pub(crate) fn load_settings() -> Settings {
    match romcheck_lib::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring settings file: {}", e);
            Settings::default()
        }
    }
}

/// Load the catalog named on the command line or in settings.
pub(crate) fn open_catalog(
    args: &CatalogArgs,
    settings: &RomTestSettings,
) -> Result<Catalog, CliError> {
    let dat = args.dat.clone().or_else(|| settings.dat.clone()).ok_or_else(|| {
        CliError::config("No DAT catalog given; pass --dat or set rom_test.dat in settings.toml")
    })?;

    let dialect = match (args.dialect, settings.dialect.as_deref()) {
        (Some(d), _) => Some(d),
        (None, Some(name)) => Some(
            name.parse::<Dialect>()
                .map_err(|e| CliError::config(e.to_string()))?,
        ),
        (None, None) => None,
    };

    let catalog = match dialect {
        Some(d) => load_catalog(&dat, d)?,
        None => load_catalog_auto(&dat)?,
    };

    log::debug!(
        "Loaded {} games ({} BIOS) from {}",
        catalog.len(),
        catalog.bios_count(),
        dat.display()
    );
    if !catalog.header.name.is_empty() {
        log::info!(
            "Catalog: {}",
            catalog.header.name.if_supports_color(Stdout, |t| t.bold())
        );
    }
    Ok(catalog)
}

/// ROM directory: explicit path, then `--root`, then the working directory.
pub(crate) fn resolve_root(path: Option<PathBuf>, root: Option<PathBuf>) -> PathBuf {
    path.or(root)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// `--bios` wins over the settings file.
pub(crate) fn resolve_bios(bios: Option<PathBuf>, settings: &RomTestSettings) -> Option<PathBuf> {
    bios.or_else(|| settings.bios_dir.clone())
}

/// Path shown to the user: relative to the ROM root when possible.
pub(crate) fn display_path<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
