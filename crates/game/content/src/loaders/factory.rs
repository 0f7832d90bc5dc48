//! Content factory for building games from data files.

use std::path::{Path, PathBuf};

use hexball_core::{CardCatalog, GameConfig, GameState, InMemoryCatalog, InitialLayout};

use crate::loaders::{CatalogLoader, ConfigLoader, LayoutLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── cards.ron
/// └── layouts/
///     └── standard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(crate::DATA_DIR)
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the card catalog from `cards.ron`.
    pub fn load_catalog(&self) -> LoadResult<InMemoryCatalog> {
        CatalogLoader::load(&self.data_dir.join("cards.ron"))
    }

    /// Load a layout from `layouts/{name}.ron`.
    pub fn load_layout(&self, name: &str) -> LoadResult<InitialLayout> {
        let path = self.data_dir.join("layouts").join(format!("{}.ron", name));
        LayoutLoader::load(&path)
    }

    /// Build the initial state for a layout after checking every card it
    /// names exists in `catalog`.
    pub fn new_game(
        &self,
        catalog: &impl CardCatalog,
        config: &GameConfig,
        layout: &InitialLayout,
        seed: u64,
    ) -> LoadResult<GameState> {
        let cards = layout
            .home
            .iter()
            .chain(&layout.away)
            .map(|p| &p.card)
            .chain(&layout.home_deck)
            .chain(&layout.away_deck);
        for card in cards {
            if catalog.card(card).is_none() {
                anyhow::bail!("layout references unknown card '{}'", card);
            }
        }

        let state = GameState::initial(layout, config, seed)
            .map_err(|e| anyhow::anyhow!("Failed to set up game: {}", e))?;
        tracing::info!(
            target: "hexball::content",
            seed,
            home_deck = layout.home_deck.len(),
            away_deck = layout.away_deck.len(),
            "new game created"
        );
        Ok(state)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexball_core::{CardDefinition, CardKind, CardRef, Team};

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_builds_a_game() {
        let factory = ContentFactory::bundled();
        let config = factory.load_config().unwrap();
        let catalog = factory.load_catalog().unwrap();
        let layout = factory.load_layout("standard").unwrap();

        let state = factory.new_game(&catalog, &config, &layout, 7).unwrap();
        assert_eq!(state.team(Team::Home).roster.len(), layout.home.len());
        assert_eq!(state.team(Team::Away).roster.len(), layout.away.len());
    }

    #[test]
    fn unknown_deck_card_is_rejected() {
        let factory = ContentFactory::bundled();
        let config = GameConfig::default();
        let catalog = InMemoryCatalog::new()
            .with(CardDefinition::new("home-starter-1", CardKind::Player, 0))
            .with(CardDefinition::new("away-starter-1", CardKind::Player, 0));
        let mut layout = InitialLayout::standard(vec![CardRef::from("mystery")], Vec::new());
        layout.home.truncate(1);
        layout.away.truncate(1);

        let err = factory.new_game(&catalog, &config, &layout, 1).unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn missing_layout_reports_path() {
        let err = ContentFactory::bundled().load_layout("nowhere").unwrap_err();
        assert!(err.to_string().contains("nowhere.ron"));
    }
}
