use std::fmt;
use std::io::BufRead;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use romcheck_core::{GameDefinition, RomDefinition, normalize_crc};

use crate::catalog::{Catalog, CatalogHeader};
use crate::error::CatalogError;

/// DAT dialects understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Line-oriented ClrMamePro block syntax, as exported by FBNeo
    FbNeo,
    /// MAME `-listxml` machine list (Logiqx `<game>` elements are accepted too)
    Mame,
}

impl Dialect {
    /// Guess the dialect from the first non-whitespace byte of a file.
    pub fn detect(first_byte: u8) -> Self {
        if first_byte == b'<' {
            Self::Mame
        } else {
            Self::FbNeo
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FbNeo => "fbneo",
            Self::Mame => "mame",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string cannot be parsed into a `Dialect`.
#[derive(Debug, Clone)]
pub struct DialectParseError(pub String);

impl fmt::Display for DialectParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown DAT dialect: '{}' (expected fbneo or mame)",
            self.0
        )
    }
}

impl std::error::Error for DialectParseError {}

impl std::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fbneo" | "fba" | "clrmamepro" | "cmp" => Ok(Self::FbNeo),
            "mame" | "xml" | "logiqx" => Ok(Self::Mame),
            _ => Err(DialectParseError(s.to_string())),
        }
    }
}

/// Parse a catalog in the given dialect.
pub fn parse_catalog<R: BufRead>(reader: R, dialect: Dialect) -> Result<Catalog, CatalogError> {
    match dialect {
        Dialect::FbNeo => parse_line_dat(reader),
        Dialect::Mame => parse_xml(reader),
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse a catalog, detecting the dialect from its first meaningful byte.
///
/// A leading UTF-8 byte order mark is dropped before detection.
pub fn parse_catalog_auto<R: BufRead>(mut reader: R) -> Result<Catalog, CatalogError> {
    if reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }

    let first = loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Err(CatalogError::parse("Empty DAT file"));
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => break buf[pos],
            None => {
                let n = buf.len();
                reader.consume(n);
            }
        }
    };
    parse_catalog(reader, Dialect::detect(first))
}

/// Load a catalog file in the given dialect.
pub fn load_catalog(path: &Path, dialect: Dialect) -> Result<Catalog, CatalogError> {
    let file = std::fs::File::open(path)?;
    let catalog = parse_catalog(std::io::BufReader::new(file), dialect)?;
    log::debug!(
        "Loaded {} games from {} ({} DAT)",
        catalog.len(),
        path.display(),
        dialect
    );
    Ok(catalog)
}

/// Load a catalog file, auto-detecting its dialect.
pub fn load_catalog_auto(path: &Path) -> Result<Catalog, CatalogError> {
    let file = std::fs::File::open(path)?;
    let catalog = parse_catalog_auto(std::io::BufReader::new(file))?;
    log::debug!("Loaded {} games from {}", catalog.len(), path.display());
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Shared ROM field handling
// ---------------------------------------------------------------------------

/// ROM attributes as read from either dialect, before validation.
#[derive(Debug, Default)]
struct RomFields {
    name: String,
    size: Option<u64>,
    crc: Option<String>,
    merge: String,
    nodump: bool,
}

impl RomFields {
    /// Validate into a definition. ROMs that cannot be verified (no dump,
    /// no CRC) yield `Ok(None)`.
    fn finish(self, game: &str) -> Result<Option<RomDefinition>, String> {
        if self.name.is_empty() {
            return Err(format!("ROM without a name in '{game}'"));
        }
        if self.nodump {
            log::debug!("Skipping nodump ROM '{}' in '{}'", self.name, game);
            return Ok(None);
        }
        let Some(raw_crc) = self.crc else {
            log::debug!("Skipping ROM '{}' in '{}': no CRC", self.name, game);
            return Ok(None);
        };
        let crc = normalize_crc(&raw_crc)
            .ok_or_else(|| format!("invalid CRC '{raw_crc}' for ROM '{}' in '{game}'", self.name))?;
        let size = self
            .size
            .ok_or_else(|| format!("ROM '{}' in '{game}' has no size", self.name))?;
        Ok(Some(RomDefinition {
            name: self.name,
            merge_name: self.merge,
            size,
            crc,
        }))
    }
}

/// Parse a ROM size, decimal or `0x`-prefixed hex.
fn parse_size(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("invalid ROM size: {value}"))
}

fn is_yes(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "yes" | "true" | "1")
}

// ---------------------------------------------------------------------------
// MAME / Logiqx XML parser
// ---------------------------------------------------------------------------

fn parse_xml<R: BufRead>(reader: R) -> Result<Catalog, CatalogError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut header = CatalogHeader::default();
    let mut games = Vec::new();
    let mut open_tags: Vec<String> = Vec::new();
    let mut current_game: Option<GameDefinition> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = tag_name(e);
                match tag.as_str() {
                    "machine" | "game" => {
                        if current_game.is_some() {
                            return Err(CatalogError::parse(format!(
                                "<{tag}> nested inside another machine"
                            )));
                        }
                        current_game = Some(parse_xml_game(e)?);
                    }
                    "rom" => push_xml_rom(&mut current_game, e)?,
                    _ => {}
                }
                open_tags.push(tag);
            }
            Event::Empty(ref e) => match tag_name(e).as_str() {
                "machine" | "game" => {
                    if current_game.is_some() {
                        return Err(CatalogError::parse(
                            "machine element nested inside another machine",
                        ));
                    }
                    games.push(parse_xml_game(e)?);
                }
                "rom" => push_xml_rom(&mut current_game, e)?,
                _ => {}
            },
            Event::Text(ref e) => {
                if current_game.is_none() && open_tags.iter().any(|t| t == "header") {
                    let text = e.unescape()?.into_owned();
                    match open_tags.last().map(String::as_str) {
                        Some("name") => header.name = text,
                        Some("description") => header.description = text,
                        Some("version") => header.version = text,
                        _ => {}
                    }
                }
            }
            Event::End(_) => {
                if let Some(tag) = open_tags.pop() {
                    if matches!(tag.as_str(), "machine" | "game") {
                        if let Some(game) = current_game.take() {
                            games.push(game);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(tag) = open_tags.last() {
        return Err(CatalogError::parse(format!(
            "unexpected end of file inside <{tag}>"
        )));
    }
    if header.name.is_empty() && games.is_empty() {
        return Err(CatalogError::parse(
            "No header or machines found in XML DAT file",
        ));
    }

    Ok(Catalog::new(header, games))
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn parse_xml_game(e: &BytesStart<'_>) -> Result<GameDefinition, CatalogError> {
    let mut game = GameDefinition::new("");
    let mut romof = None;
    let mut cloneof = None;

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"name" => game.name = value,
            b"romof" => romof = Some(value),
            b"cloneof" => cloneof = Some(value),
            b"isbios" => game.is_bios = is_yes(&value),
            _ => {}
        }
    }

    if game.name.is_empty() {
        return Err(CatalogError::parse("machine element without a name"));
    }
    game.parent = romof.or(cloneof).unwrap_or_default();
    Ok(game)
}

/// Add a `<rom>` to the open machine. ROMs outside a machine are ignored.
fn push_xml_rom(
    current_game: &mut Option<GameDefinition>,
    e: &BytesStart<'_>,
) -> Result<(), CatalogError> {
    let Some(game) = current_game.as_mut() else {
        return Ok(());
    };

    let mut fields = RomFields::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"name" => fields.name = value,
            b"size" => fields.size = Some(parse_size(&value).map_err(CatalogError::Parse)?),
            b"crc" => fields.crc = Some(value),
            b"merge" => fields.merge = value,
            b"status" => fields.nodump = value.eq_ignore_ascii_case("nodump"),
            _ => {}
        }
    }

    if let Some(rom) = fields.finish(&game.name).map_err(CatalogError::Parse)? {
        game.roms.push(rom);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// FBNeo / ClrMamePro line parser
// ---------------------------------------------------------------------------

/// A `game (` or `resource (` block being read.
struct PendingGame {
    game: GameDefinition,
    romof: Option<String>,
    cloneof: Option<String>,
    start_line: usize,
}

impl PendingGame {
    fn finish(self) -> Result<GameDefinition, CatalogError> {
        let mut game = self.game;
        if game.name.is_empty() {
            return Err(CatalogError::at_line(self.start_line, "game block without a name"));
        }
        game.parent = self.romof.or(self.cloneof).unwrap_or_default();
        Ok(game)
    }
}

/// Parse a ClrMamePro format DAT file.
///
/// Format:
/// ```text
/// clrmamepro (
///     name "FinalBurn Neo - Arcade Games"
///     version 1.0.0.03
/// )
///
/// game (
///     name mslug
///     romof neogeo
///     rom ( name 201-p1.p1 size 2097152 crc 08d8daa5 )
/// )
///
/// resource (
///     name neogeo
///     rom ( name sp-s2.sp1 size 131072 crc 9036d879 )
/// )
/// ```
fn parse_line_dat<R: BufRead>(reader: R) -> Result<Catalog, CatalogError> {
    let mut header = CatalogHeader::default();
    let mut games = Vec::new();

    // Open block type and the line it started on
    let mut block: Option<(String, usize)> = None;
    let mut pending: Option<PendingGame> = None;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line_result?;
        let trimmed = line.trim_start_matches('\u{feff}').trim();

        if trimmed.is_empty() {
            continue;
        }

        if block.is_none() {
            if let Some(block_type) = detect_block_start(trimmed) {
                if is_game_block(&block_type) {
                    pending = Some(PendingGame {
                        game: GameDefinition::new("").bios(block_type == "resource"),
                        romof: None,
                        cloneof: None,
                        start_line: line_no,
                    });
                }
                block = Some((block_type, line_no));
            } else if trimmed == ")" {
                return Err(CatalogError::at_line(line_no, "')' without an open block"));
            } else {
                log::debug!("line {line_no}: ignoring text outside of a block");
            }
            continue;
        }

        if trimmed == ")" {
            if let Some((block_type, _)) = block.take() {
                if is_game_block(&block_type) {
                    if let Some(game) = pending.take() {
                        games.push(game.finish()?);
                    }
                }
            }
            continue;
        }

        if let Some(nested) = detect_block_start(trimmed) {
            let (open, start) = block.as_ref().map_or(("?", 0), |(t, l)| (t.as_str(), *l));
            return Err(CatalogError::at_line(
                line_no,
                format!("'{nested}' block opened before '{open}' block from line {start} was closed"),
            ));
        }

        let Some((key, value)) = parse_kv(trimmed) else {
            continue;
        };
        let block_type = block.as_ref().map_or("", |(t, _)| t.as_str());

        match block_type {
            "clrmamepro" => match key.as_str() {
                "name" => header.name = value,
                "description" => header.description = value,
                "version" => header.version = value,
                _ => {}
            },
            t if is_game_block(t) => {
                if let Some(ref mut current) = pending {
                    match key.as_str() {
                        "name" => current.game.name = value,
                        "romof" => current.romof = Some(value),
                        "cloneof" => current.cloneof = Some(value),
                        "isbios" => current.game.is_bios |= is_yes(&value),
                        "rom" => {
                            let rom = parse_line_rom(&value, &current.game.name)
                                .map_err(|e| CatalogError::at_line(line_no, e))?;
                            if let Some(rom) = rom {
                                current.game.roms.push(rom);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if let Some((block_type, start)) = block {
        return Err(CatalogError::at_line(
            start,
            format!("unterminated '{block_type}' block"),
        ));
    }
    if header.name.is_empty() && games.is_empty() {
        return Err(CatalogError::parse(
            "No header or games found in ClrMamePro DAT file",
        ));
    }

    Ok(Catalog::new(header, games))
}

fn is_game_block(block_type: &str) -> bool {
    matches!(block_type, "game" | "machine" | "resource")
}

/// Detect a block start like `clrmamepro (` or `game (`.
fn detect_block_start(line: &str) -> Option<String> {
    let stripped = line.strip_suffix('(')?;
    let block_type = stripped.trim();
    if !block_type.is_empty() && block_type.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Some(block_type.to_lowercase());
    }
    None
}

/// Parse a key-value line like `name "Some Value"` or `romof neogeo`.
/// For `rom ( ... )` lines, the value is the content inside outer parens.
fn parse_kv(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix("rom") {
        let rest = rest.trim();
        if let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            return Some(("rom".to_string(), inner.trim().to_string()));
        }
    }

    let mut parts = trimmed.splitn(2, |c: char| c.is_ascii_whitespace());
    let key = parts.next()?.trim().to_lowercase();
    let raw_value = parts.next()?.trim();

    let value = raw_value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw_value)
        .to_string();

    Some((key, value))
}

/// Parse an inline ROM entry like:
/// `name 201-p1.p1 size 2097152 crc 08d8daa5 merge 201-p1.p1`
fn parse_line_rom(inner: &str, game: &str) -> Result<Option<RomDefinition>, String> {
    let tokens = tokenize_rom_line(inner);
    let mut fields = RomFields::default();

    let mut i = 0;
    while i < tokens.len() {
        let value = tokens.get(i + 1);
        match tokens[i].as_str() {
            "name" => {
                fields.name = value.cloned().unwrap_or_default();
                i += 1;
            }
            "size" => {
                fields.size = value.map(|v| parse_size(v)).transpose()?;
                i += 1;
            }
            "crc" => {
                fields.crc = value.cloned();
                i += 1;
            }
            "merge" => {
                fields.merge = value.cloned().unwrap_or_default();
                i += 1;
            }
            "flags" | "status" => {
                fields.nodump |= value.is_some_and(|v| v.eq_ignore_ascii_case("nodump"));
                i += 1;
            }
            "nodump" => fields.nodump = true,
            _ => {}
        }
        i += 1;
    }

    fields.finish(game)
}

/// Tokenize a ROM line, respecting quoted strings.
/// `name "a b.bin" size 12345 crc AB` → ["name", "a b.bin", "size", "12345", "crc", "AB"]
fn tokenize_rom_line(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }

        if chars.peek().is_none() {
            break;
        }

        let mut token = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_ascii_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
