//! Card catalog oracle.
//!
//! Card content is data owned outside the core. The engine only looks cards
//! up by slug: to read fate values during skill tests, to resolve a play
//! card's effect and to register an ability's or asset's triggers.

use std::collections::BTreeMap;

use super::OracleError;
use crate::effect::Effect;
use crate::state::CardRef;
use crate::trigger::{Condition, EventKind, EventMask, Provenance, Timing, Trigger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum CardKind {
    /// One-shot card: resolves its effect through the stack, then is discarded.
    Play,
    /// Attaches to a player and contributes triggers while attached.
    Ability,
    /// Sits in the shared play area and contributes triggers.
    Asset,
    /// A rostered player's own card; never played from hand.
    Player,
}

/// Catalog form of a trigger; provenance is filled in when the card enters play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerSpec {
    pub events: Vec<EventKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub timing: Timing,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Option<Condition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub once: bool,
    pub effect: Effect,
}

impl TriggerSpec {
    pub fn to_trigger(&self, provenance: Provenance) -> Trigger {
        let mut trigger = Trigger::new(EventMask::of(&self.events), self.effect.clone(), provenance)
            .with_timing(self.timing)
            .with_priority(self.priority);
        if let Some(condition) = &self.condition {
            trigger = trigger.with_condition(condition.clone());
        }
        if self.once {
            trigger = trigger.once();
        }
        trigger
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub slug: CardRef,
    pub name: String,
    pub kind: CardKind,
    /// Value revealed when this card is flipped for a skill test.
    pub fate: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub triggers: Vec<TriggerSpec>,
    /// Resolved when a `Play` card leaves the stack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<Effect>,
    /// Playing the card requires a target player.
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_target: bool,
}

impl CardDefinition {
    pub fn new(slug: impl Into<CardRef>, kind: CardKind, fate: i32) -> Self {
        let slug = slug.into();
        Self {
            name: slug.to_string(),
            slug,
            kind,
            fate,
            triggers: Vec::new(),
            effect: None,
            requires_target: false,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerSpec) -> Self {
        self.triggers.push(trigger);
        self
    }

    #[must_use]
    pub fn targeted(mut self) -> Self {
        self.requires_target = true;
        self
    }

    /// Whether a card of this kind can be played from hand at all.
    pub fn is_playable(&self) -> bool {
        !matches!(self.kind, CardKind::Player)
    }

    /// Checks the definition is coherent for its kind.
    ///
    /// # Errors
    ///
    /// [`OracleError::InvalidCard`] when a targeted play card has nothing to
    /// resolve, when a player card carries effects or triggers, or when a
    /// play card lists triggers it could never register.
    pub fn validate(&self) -> Result<(), OracleError> {
        let reason = match self.kind {
            CardKind::Play if self.requires_target && self.effect.is_none() => {
                "requires a target but has no effect"
            }
            CardKind::Play if !self.triggers.is_empty() => "play cards cannot carry triggers",
            CardKind::Player if self.effect.is_some() || !self.triggers.is_empty() => {
                "player cards cannot carry effects"
            }
            _ => return Ok(()),
        };
        Err(OracleError::InvalidCard {
            slug: self.slug.clone(),
            reason: reason.to_owned(),
        })
    }
}

/// Read-only lookup of card definitions by slug.
pub trait CardCatalog: Send + Sync {
    fn card(&self, slug: &CardRef) -> Option<&CardDefinition>;

    fn lookup(&self, slug: &CardRef) -> Result<&CardDefinition, OracleError> {
        self.card(slug)
            .ok_or_else(|| OracleError::CardNotFound(slug.clone()))
    }

    /// Fate value of a card; unknown cards reveal zero.
    fn fate(&self, slug: &CardRef) -> i32 {
        self.card(slug).map_or(0, |c| c.fate)
    }
}

/// Catalog backed by an in-memory map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    cards: BTreeMap<CardRef, CardDefinition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, card: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(card.slug.clone(), card)
    }

    #[must_use]
    pub fn with(mut self, card: CardDefinition) -> Self {
        self.insert(card);
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &CardRef> {
        self.cards.keys()
    }
}

impl FromIterator<CardDefinition> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for card in iter {
            catalog.insert(card);
        }
        catalog
    }
}

impl CardCatalog for InMemoryCatalog {
    fn card(&self, slug: &CardRef) -> Option<&CardDefinition> {
        self.cards.get(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targeted_play_without_effect_is_invalid() {
        let card = CardDefinition::new("whistle", CardKind::Play, 2).targeted();
        let err = card.validate().unwrap_err();
        assert!(matches!(err, OracleError::InvalidCard { ref slug, .. } if slug.as_str() == "whistle"));
    }

    #[test]
    fn player_cards_carry_no_effects() {
        let plain = CardDefinition::new("guard", CardKind::Player, 1);
        assert!(plain.validate().is_ok());

        let loaded = plain.with_effect(Effect::Noop);
        assert!(loaded.validate().is_err());
    }

    #[test]
    fn abilities_may_require_a_target_without_an_effect() {
        let card = CardDefinition::new("lockdown", CardKind::Ability, 3).targeted();
        assert!(card.validate().is_ok());
    }
}
