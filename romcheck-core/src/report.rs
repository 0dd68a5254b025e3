use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rom::RomDefinition;

/// Severity tier, used both per ROM and aggregated per archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Green,
    Yellow,
    Red,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Green => "\u{1F7E2}",
            Self::Yellow => "\u{1F7E1}",
            Self::Red => "\u{1F534}",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate severity from per-ROM counts.
///
/// Green when nothing is yellow or red; otherwise yellow while red results
/// make up less than half of the total, red from half upward.
pub fn classify(red: usize, yellow: usize, green: usize) -> State {
    let total = red + yellow + green;
    if total == 0 || (red == 0 && yellow == 0) {
        State::Green
    } else if 2 * red < total {
        State::Yellow
    } else {
        State::Red
    }
}

/// Why a declared ROM did not verify cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// No archive entry carries the ROM's name (or merge name)
    Missing,
    /// Missing, but the ROM is merged and may live in the parent set
    MissingMerged,
    SizeMismatch { expected: u64, actual: u64 },
    CrcMismatch { expected: String, actual: String },
    /// Several entries share the base name and none matches size and CRC
    NoMatchingCandidate { candidates: usize },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::MissingMerged => write!(f, "missing (merged from parent set)"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, found {actual}")
            }
            Self::CrcMismatch { expected, actual } => {
                write!(f, "crc mismatch: expected {expected}, found {actual}")
            }
            Self::NoMatchingCandidate { candidates } => {
                write!(f, "no matching candidate among {candidates} entries")
            }
        }
    }
}

/// One dependency in a game's parent/BIOS chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentInfo {
    /// Expected archive file name, e.g. `neogeo.zip`
    pub name: String,
    /// Whether that archive was found on disk
    pub exist: bool,
    pub is_bios: bool,
}

/// Verification outcome for one declared ROM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRomResult {
    pub sub_rom: RomDefinition,
    pub state: State,
    pub message: String,
}

impl SubRomResult {
    pub fn new(sub_rom: RomDefinition, state: State, message: impl Into<String>) -> Self {
        Self {
            sub_rom,
            state,
            message: message.into(),
        }
    }

    pub fn ok(sub_rom: RomDefinition) -> Self {
        Self::new(sub_rom, State::Green, "ok")
    }
}

/// Per-file verdict printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Ok,
    Warn,
    Error,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "test ok",
            Self::Warn => "test warn",
            Self::Error => "test error",
        }
    }
}

/// Verification outcome for one archive file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    pub file_path: PathBuf,
    /// Catalog name of the game, when the file's base name was found
    pub game: Option<String>,
    /// File-level note: a catalog lookup miss or an archive read failure
    pub note: Option<String>,
    /// The archive itself could not be read
    pub archive_error: bool,
    pub parent_list: Vec<ParentInfo>,
    pub green: Vec<SubRomResult>,
    pub yellow: Vec<SubRomResult>,
    pub red: Vec<SubRomResult>,
}

impl FileResult {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            game: None,
            note: None,
            archive_error: false,
            parent_list: Vec::new(),
            green: Vec::new(),
            yellow: Vec::new(),
            red: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// File the result into the list for its state.
    pub fn push(&mut self, result: SubRomResult) {
        match result.state {
            State::Green => self.green.push(result),
            State::Yellow => self.yellow.push(result),
            State::Red => self.red.push(result),
        }
    }

    pub fn has_red(&self) -> bool {
        !self.red.is_empty()
    }

    /// Parents or BIOS sets that were not found on disk.
    pub fn missing_parents(&self) -> impl Iterator<Item = &ParentInfo> {
        self.parent_list.iter().filter(|p| !p.exist)
    }

    /// Aggregate severity of the sub-ROM results.
    pub fn status(&self) -> State {
        if self.archive_error {
            return State::Red;
        }
        classify(self.red.len(), self.yellow.len(), self.green.len())
    }

    pub fn verdict(&self) -> Verdict {
        if self.archive_error || self.has_red() {
            Verdict::Error
        } else if !self.yellow.is_empty()
            || self.game.is_none()
            || self.missing_parents().next().is_some()
        {
            Verdict::Warn
        } else {
            Verdict::Ok
        }
    }

    /// All sub-ROM results, worst first.
    pub fn sub_roms(&self) -> impl Iterator<Item = &SubRomResult> {
        self.red.iter().chain(&self.yellow).chain(&self.green)
    }
}

/// Results for every archive examined, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub list: Vec<FileResult>,
}

/// Per-verdict file counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictCounts {
    pub ok: usize,
    pub warn: usize,
    pub error: usize,
}

impl Report {
    /// True when any file has at least one red sub-ROM result.
    ///
    /// Missing parents or BIOS sets alone never fail a run.
    pub fn has_failures(&self) -> bool {
        self.list.iter().any(FileResult::has_red)
    }

    pub fn counts(&self) -> VerdictCounts {
        let mut counts = VerdictCounts::default();
        for file in &self.list {
            match file.verdict() {
                Verdict::Ok => counts.ok += 1,
                Verdict::Warn => counts.warn += 1,
                Verdict::Error => counts.error += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
