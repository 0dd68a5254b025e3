use std::collections::HashMap;

use romcheck_core::{GameDefinition, normalize_name};

/// Header metadata carried by a DAT file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogHeader {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// Immutable lookup of game definitions by case-insensitive name.
///
/// Built once per run and only read afterwards, so it can be shared freely
/// between the resolver and the matcher.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub header: CatalogHeader,
    games: HashMap<String, GameDefinition>,
}

impl Catalog {
    /// Build a catalog from parsed games. Later definitions of the same name
    /// replace earlier ones.
    pub fn new(header: CatalogHeader, games: impl IntoIterator<Item = GameDefinition>) -> Self {
        let mut map = HashMap::new();
        for game in games {
            let key = normalize_name(&game.name);
            if map.insert(key, game).is_some() {
                log::warn!("Duplicate game definition in DAT, keeping the last one");
            }
        }
        Self { header, games: map }
    }

    pub fn from_games(games: impl IntoIterator<Item = GameDefinition>) -> Self {
        Self::new(CatalogHeader::default(), games)
    }

    /// Look up a game by name (trimmed, case-insensitive).
    pub fn get(&self, name: &str) -> Option<&GameDefinition> {
        self.games.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games in unspecified order.
    pub fn games(&self) -> impl Iterator<Item = &GameDefinition> {
        self.games.values()
    }

    /// Number of games flagged as BIOS sets.
    pub fn bios_count(&self) -> usize {
        self.games.values().filter(|g| g.is_bios).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::from_games([GameDefinition::new("SF2CE")]);
        assert!(catalog.contains("sf2ce"));
        assert!(catalog.contains(" Sf2Ce "));
        assert_eq!(catalog.get("sf2ce").map(|g| g.name.as_str()), Some("SF2CE"));
        assert!(!catalog.contains("sf2"));
    }

    #[test]
    fn test_duplicate_keeps_last() {
        let catalog = Catalog::from_games([
            GameDefinition::new("game"),
            GameDefinition::new("GAME").bios(true),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("game").is_some_and(|g| g.is_bios));
        assert_eq!(catalog.bios_count(), 1);
    }
}
