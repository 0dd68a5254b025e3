//! Matching of declared ROMs against archive entries.
//!
//! For each ROM the candidate set is every entry whose base name equals the
//! ROM's name (falling back to its merge name). Then:
//!
//! - no candidate: one "missing" result
//! - one candidate: size and CRC are checked independently, so a candidate
//!   wrong on both counts yields two results
//! - several candidates (same base name in different subdirectories): the
//!   ROM passes if any candidate matches both size and CRC, otherwise it
//!   gets exactly one "no matching candidate" result
//!
//! A ROM that verifies produces no result at all.

use romcheck_core::{
    ArchiveEntry, GameDefinition, Issue, RomDefinition, State, SubRomResult, base_name,
};

/// Match every ROM of `game` against the archive's entries.
///
/// Results follow the catalog's ROM order.
pub fn match_game(game: &GameDefinition, entries: &[ArchiveEntry]) -> Vec<SubRomResult> {
    game.roms
        .iter()
        .flat_map(|rom| match_rom(rom, entries))
        .collect()
}

/// Match a single declared ROM. An empty result means it verified.
pub fn match_rom(rom: &RomDefinition, entries: &[ArchiveEntry]) -> Vec<SubRomResult> {
    let candidates = find_candidates(rom, entries);
    check_rom(rom, &candidates)
        .into_iter()
        .map(|issue| SubRomResult::new(rom.clone(), issue_state(&issue), issue.to_string()))
        .collect()
}

/// Entries whose base name equals the ROM's name, or its merge name when
/// nothing carries the ROM's own name.
pub fn find_candidates<'a>(rom: &RomDefinition, entries: &'a [ArchiveEntry]) -> Vec<&'a ArchiveEntry> {
    let by_name = entries_named(entries, &rom.name);
    if by_name.is_empty() && rom.has_merge_name() {
        return entries_named(entries, &rom.merge_name);
    }
    by_name
}

fn entries_named<'a>(entries: &'a [ArchiveEntry], name: &str) -> Vec<&'a ArchiveEntry> {
    let wanted = base_name(name);
    entries
        .iter()
        .filter(|e| e.base_name() == wanted)
        .collect()
}

/// Issues for one ROM given its candidate entries.
pub fn check_rom(rom: &RomDefinition, candidates: &[&ArchiveEntry]) -> Vec<Issue> {
    match candidates {
        [] if rom.has_merge_name() => vec![Issue::MissingMerged],
        [] => vec![Issue::Missing],
        [only] => {
            let mut issues = Vec::new();
            if only.size != rom.size {
                issues.push(Issue::SizeMismatch {
                    expected: rom.size,
                    actual: only.size,
                });
            }
            if !only.crc.eq_ignore_ascii_case(&rom.crc) {
                issues.push(Issue::CrcMismatch {
                    expected: rom.crc.clone(),
                    actual: only.crc.clone(),
                });
            }
            issues
        }
        many => {
            if many.iter().any(|e| is_exact_match(rom, e)) {
                Vec::new()
            } else {
                vec![Issue::NoMatchingCandidate {
                    candidates: many.len(),
                }]
            }
        }
    }
}

fn is_exact_match(rom: &RomDefinition, entry: &ArchiveEntry) -> bool {
    entry.size == rom.size && entry.crc.eq_ignore_ascii_case(&rom.crc)
}

/// Severity of a single issue.
///
/// A merged ROM that is absent is only a warning: split sets keep it in the
/// parent archive. Everything else is a hard failure.
pub fn issue_state(issue: &Issue) -> State {
    match issue {
        Issue::MissingMerged => State::Yellow,
        _ => State::Red,
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
