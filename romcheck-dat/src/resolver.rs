//! Parent/clone/BIOS chain resolution.
//!
//! Walks `romof`/`cloneof` links from a game toward its root. The chain is
//! ordered immediate parent first, root last, and never includes the game
//! itself. Existence of each ancestor's archive on disk is left to the
//! caller; every [`ParentInfo`] starts with `exist = false`.

use std::collections::HashSet;

use romcheck_core::{ParentInfo, normalize_name};

use crate::catalog::Catalog;

/// Archive extension assumed for ancestors when none is given.
pub const DEFAULT_ARCHIVE_EXT: &str = "zip";

/// Resolve the ancestor chain of `game_name`.
///
/// Stops when a game has no parent, when a parent is not in the catalog
/// (that parent is still listed), or when a name repeats. A repeat means the
/// catalog has a cycle; resolution stops there without error.
pub fn resolve_chain(catalog: &Catalog, game_name: &str, archive_ext: &str) -> Vec<ParentInfo> {
    let ext = archive_ext.trim_start_matches('.');
    let ext = if ext.is_empty() { DEFAULT_ARCHIVE_EXT } else { ext };

    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(normalize_name(game_name));

    let mut current = catalog.get(game_name);
    while let Some(game) = current {
        if !game.has_parent() {
            break;
        }
        if !visited.insert(normalize_name(&game.parent)) {
            log::debug!(
                "Parent cycle at '{}' -> '{}' while resolving '{}'",
                game.name,
                game.parent,
                game_name
            );
            break;
        }

        let ancestor = catalog.get(&game.parent);
        let name = ancestor.map_or(game.parent.as_str(), |a| a.name.as_str());
        chain.push(ParentInfo {
            name: format!("{name}.{ext}"),
            exist: false,
            is_bios: ancestor.is_some_and(|a| a.is_bios),
        });
        if ancestor.is_none() {
            log::debug!("Parent '{}' of '{}' is not in the catalog", game.parent, game.name);
        }
        current = ancestor;
    }

    chain
}
