//! romcheck CLI
//!
//! Command-line interface for verifying arcade ROM sets against DAT catalogs.

mod cli_types;
mod commands;
mod error;
mod logger;
mod spinner;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Cannot set up logging: {}", e);
        std::process::exit(1);
    }

    match run(cli) {
        Ok(true) => std::process::exit(1),
        Ok(false) => {}
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Dispatch a command. `Ok(true)` means the run found failures.
fn run(cli: Cli) -> Result<bool, CliError> {
    match cli.command {
        Commands::RomTest {
            catalog,
            bios,
            ext,
            details,
            no_warn,
            path,
        } => commands::rom_test::run_rom_test(
            catalog, bios, ext, details, no_warn, path, cli.root, cli.quiet,
        ),
        Commands::Inspect { catalog, bios, rom } => {
            commands::inspect::run_inspect(catalog, bios, rom, cli.root).map(|()| false)
        }
        Commands::Parents {
            catalog,
            bios,
            game,
        } => commands::parents::run_parents(catalog, bios, game, cli.root).map(|()| false),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show().map(|()| false),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(false)
            }
        },
    }
}
