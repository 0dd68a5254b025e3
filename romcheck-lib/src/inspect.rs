//! Per-game detail view, serialized to JSON for frontends.

use std::path::Path;

use serde::Serialize;

use romcheck_core::{FileResult, ParentInfo, State, SubRomResult};
use romcheck_dat::Catalog;

use crate::tester::{TestOptions, test_file};

/// Status, parent chain and sub-ROM results for one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameInspection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: State,
    pub emoji: &'static str,
    pub parents: Vec<ParentInfo>,
    pub dat_subroms: Vec<DatSubRom>,
}

/// One declared ROM and how it fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatSubRom {
    pub name: String,
    pub merge_name: String,
    pub size: u64,
    pub crc: String,
    pub state: State,
    pub message: String,
}

impl From<&SubRomResult> for DatSubRom {
    fn from(result: &SubRomResult) -> Self {
        Self {
            name: result.sub_rom.name.clone(),
            merge_name: result.sub_rom.merge_name.clone(),
            size: result.sub_rom.size,
            crc: result.sub_rom.crc.clone(),
            state: result.state,
            message: result.message.clone(),
        }
    }
}

impl From<&FileResult> for GameInspection {
    fn from(file: &FileResult) -> Self {
        let status = file.status();
        Self {
            game: file.game.clone(),
            note: file.note.clone(),
            status,
            emoji: status.emoji(),
            parents: file.parent_list.clone(),
            dat_subroms: file.sub_roms().map(DatSubRom::from).collect(),
        }
    }
}

impl GameInspection {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Test one archive and build its detail view.
///
/// Sub-ROMs are listed worst first: red, then yellow, then green.
pub fn inspect_game(
    catalog: &Catalog,
    rom_path: &Path,
    root: &Path,
    options: &TestOptions,
) -> GameInspection {
    GameInspection::from(&test_file(catalog, rom_path, root, options))
}
