//! Initial layout loader.
//!
//! Layout files describe both rosters and both decks. Starting tiles are
//! written in offset `(col, row)` coordinates, the way a court is drawn.

use std::path::Path;

use hexball_core::state::PlayerSetup;
use hexball_core::{CardRef, InitialLayout, Position, Stats};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One rostered player as written in a layout file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRon {
    pub card: CardRef,
    pub stats: Stats,
    #[serde(default)]
    pub start: Option<(i32, i32)>,
}

/// Layout file structure; decks list `(card, copies)` pairs, bottom first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRon {
    pub home: Vec<PlayerRon>,
    pub away: Vec<PlayerRon>,
    pub home_deck: Vec<(CardRef, u32)>,
    pub away_deck: Vec<(CardRef, u32)>,
}

/// Loader for initial layouts from RON files.
pub struct LayoutLoader;

impl LayoutLoader {
    /// Load a layout from a RON file.
    pub fn load(path: &Path) -> LoadResult<InitialLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<InitialLayout> {
        let layout: LayoutRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse layout RON: {}", e))?;

        Ok(InitialLayout {
            home: roster(layout.home),
            away: roster(layout.away),
            home_deck: expand_deck(&layout.home_deck),
            away_deck: expand_deck(&layout.away_deck),
        })
    }
}

fn roster(players: Vec<PlayerRon>) -> Vec<PlayerSetup> {
    players
        .into_iter()
        .map(|p| {
            let start = p.start.map(|(col, row)| Position::from_offset(col, row));
            PlayerSetup::new(p.card, p.stats, start)
        })
        .collect()
}

fn expand_deck(entries: &[(CardRef, u32)]) -> Vec<CardRef> {
    entries
        .iter()
        .flat_map(|(card, copies)| std::iter::repeat_n(card.clone(), *copies as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"(
        home: [
            (card: "home-point", stats: (size: Small, speed: 5, shooting: 4, passing: 5, dribbling: 5, defense: 2), start: Some((4, 1))),
            (card: "home-bench", stats: (size: Medium, speed: 3, shooting: 3, passing: 3, dribbling: 3, defense: 3)),
        ],
        away: [
            (card: "away-point", stats: (size: Small, speed: 5, shooting: 4, passing: 5, dribbling: 5, defense: 2), start: Some((8, 1))),
        ],
        home_deck: [("jumper", 2), ("timeout", 1)],
        away_deck: [("jumper", 3)],
    )"#;

    #[test]
    fn offsets_become_axial_positions() {
        let layout = LayoutLoader::parse(SMALL).unwrap();
        assert_eq!(layout.home[0].start, Some(Position::from_offset(4, 1)));
        assert_eq!(layout.home[1].start, None);
        assert_eq!(layout.away.len(), 1);
    }

    #[test]
    fn deck_copies_expand_in_order() {
        let layout = LayoutLoader::parse(SMALL).unwrap();
        let names: Vec<&str> = layout.home_deck.iter().map(CardRef::as_str).collect();
        assert_eq!(names, ["jumper", "jumper", "timeout"]);
        assert_eq!(layout.away_deck.len(), 3);
    }
}
