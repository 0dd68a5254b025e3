//! User settings for ROM test runs.
//!
//! Read from `~/.config/romcheck/settings.toml`:
//!
//! ```toml
//! [rom_test]
//! dat = "/data/dats/fbneo_arcade.dat"
//! dialect = "fbneo"
//! bios_dir = "/data/bios"
//! extensions = ["zip", "7z"]
//! ```
//!
//! Every key is optional; command-line flags take precedence.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tester::DEFAULT_EXTENSIONS;

/// Canonical path to the settings file: `~/.config/romcheck/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romcheck").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rom_test: RomTestSettings,
}

/// The `[rom_test]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RomTestSettings {
    /// Default catalog file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dat: Option<PathBuf>,
    /// Catalog dialect name; auto-detected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bios_dir: Option<PathBuf>,
    pub extensions: Vec<String>,
}

impl Default for RomTestSettings {
    fn default() -> Self {
        Self {
            dat: None,
            dialect: None,
            bios_dir: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Load settings from the canonical path. A missing file gives defaults.
pub fn load_settings() -> io::Result<Settings> {
    load_settings_from(&settings_path())
}

/// Load settings from `path`. A missing file gives defaults.
pub fn load_settings_from(path: &Path) -> io::Result<Settings> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(e),
    };
    toml::from_str(&contents).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), e),
        )
    })
}

/// Effective settings as pretty-printed TOML, for display.
pub fn settings_string(settings: &Settings) -> io::Result<String> {
    toml::to_string_pretty(settings).map_err(io::Error::other)
}
