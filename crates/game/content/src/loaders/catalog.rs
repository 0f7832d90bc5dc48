//! Card catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use hexball_core::{CardDefinition, InMemoryCatalog};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Card catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalogRon {
    pub cards: Vec<CardDefinition>,
}

/// Loader for the card catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a card catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<InMemoryCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a catalog; slugs must be unique and every card coherent for its kind.
    pub fn parse(content: &str) -> LoadResult<InMemoryCatalog> {
        let catalog: CardCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for card in &catalog.cards {
            if !seen.insert(card.slug.clone()) {
                anyhow::bail!("duplicate card slug '{}'", card.slug);
            }
            card.validate()?;
        }

        tracing::debug!(
            target: "hexball::content",
            cards = catalog.cards.len(),
            "card catalog parsed"
        );
        Ok(catalog.cards.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexball_core::{CardCatalog, CardKind, CardRef};

    #[test]
    fn parses_minimal_cards() {
        let catalog = CatalogLoader::parse(
            r#"(cards: [
                (slug: "fade-away", name: "Fade Away", kind: Play, fate: 4),
                (slug: "scout", name: "Scout", kind: Asset, fate: 2),
            ])"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        let card = catalog.card(&CardRef::from("scout")).unwrap();
        assert_eq!(card.kind, CardKind::Asset);
        assert!(card.triggers.is_empty());
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let err = CatalogLoader::parse(
            r#"(cards: [
                (slug: "scout", name: "Scout", kind: Asset, fate: 2),
                (slug: "scout", name: "Scout", kind: Asset, fate: 3),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn incoherent_cards_are_rejected() {
        let err = CatalogLoader::parse(
            r#"(cards: [
                (slug: "guard", name: "Guard", kind: Player, fate: 1, effect: Some(Noop)),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("guard"));
    }

    #[test]
    fn bundled_catalog_wires_triggers() {
        let catalog = CatalogLoader::load(&Path::new(crate::DATA_DIR).join("cards.ron")).unwrap();
        let press = catalog.card(&CardRef::from("full-court-press")).unwrap();
        assert_eq!(press.kind, CardKind::Asset);
        assert_eq!(press.triggers.len(), 1);
        assert!(press.triggers[0].once);

        let hot_hand = catalog.card(&CardRef::from("hot-hand")).unwrap();
        assert!(hot_hand.requires_target);
        assert!(hot_hand.effect.is_some());
    }
}
