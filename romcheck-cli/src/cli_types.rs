//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use romcheck_lib::Dialect;

#[derive(Parser)]
#[command(name = "romcheck")]
#[command(about = "Verify arcade ROM sets against DAT catalogs", long_about = None)]
pub(crate) struct Cli {
    /// ROM directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Catalog selection shared by every command that reads a DAT.
#[derive(Args, Clone)]
pub(crate) struct CatalogArgs {
    /// DAT catalog file (defaults to rom_test.dat in settings.toml)
    #[arg(short, long)]
    pub dat: Option<PathBuf>,

    /// Catalog dialect: fbneo or mame (auto-detected when omitted)
    #[arg(long)]
    pub dialect: Option<Dialect>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Test every archive in a ROM directory against a catalog
    RomTest {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Directory holding BIOS sets
        #[arg(short, long)]
        bios: Option<PathBuf>,

        /// Archive extensions to test (e.g., zip,7z)
        #[arg(short, long, value_delimiter = ',')]
        ext: Option<Vec<String>>,

        /// Print a line for every failed or suspicious sub-ROM
        #[arg(long)]
        details: bool,

        /// Hide yellow sub-ROM lines in --details output
        #[arg(long)]
        no_warn: bool,

        /// ROM directory to test (overrides --root)
        path: Option<PathBuf>,
    },

    /// Print the JSON detail view for one archive
    Inspect {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Directory holding BIOS sets
        #[arg(short, long)]
        bios: Option<PathBuf>,

        /// Archive to inspect
        rom: PathBuf,
    },

    /// Show a game's parent and BIOS chain
    Parents {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Directory holding BIOS sets
        #[arg(short, long)]
        bios: Option<PathBuf>,

        /// Game name as it appears in the catalog
        game: String,
    },

    /// Show settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings
    Show,

    /// Print the settings file path
    Path,
}
