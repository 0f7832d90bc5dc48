//! Card piles and per-team records.

use std::collections::BTreeMap;

use super::common::{CardRef, InstanceId, PlayerId, Team};
use super::player::Player;

/// One physical card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardInstance {
    pub id: InstanceId,
    pub card: CardRef,
}

impl CardInstance {
    pub fn new(id: InstanceId, card: impl Into<CardRef>) -> Self {
        Self {
            id,
            card: card.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum Pile {
    Draw,
    Hand,
    Discard,
    Removed,
}

impl Pile {
    pub const ALL: [Pile; 4] = [Pile::Draw, Pile::Hand, Pile::Discard, Pile::Removed];
}

/// Four disjoint ordered piles. The top of the draw pile is its last element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    pub draw: Vec<CardInstance>,
    pub hand: Vec<CardInstance>,
    pub discard: Vec<CardInstance>,
    pub removed: Vec<CardInstance>,
}

impl Deck {
    pub fn with_draw_pile(draw: Vec<CardInstance>) -> Self {
        Self {
            draw,
            ..Self::default()
        }
    }

    pub fn pile(&self, pile: Pile) -> &Vec<CardInstance> {
        match pile {
            Pile::Draw => &self.draw,
            Pile::Hand => &self.hand,
            Pile::Discard => &self.discard,
            Pile::Removed => &self.removed,
        }
    }

    pub fn pile_mut(&mut self, pile: Pile) -> &mut Vec<CardInstance> {
        match pile {
            Pile::Draw => &mut self.draw,
            Pile::Hand => &mut self.hand,
            Pile::Discard => &mut self.discard,
            Pile::Removed => &mut self.removed,
        }
    }

    /// Which pile holds the instance, if any.
    pub fn locate(&self, id: InstanceId) -> Option<Pile> {
        Pile::ALL
            .into_iter()
            .find(|pile| self.pile(*pile).iter().any(|c| c.id == id))
    }

    pub fn in_hand(&self, id: InstanceId) -> Option<&CardInstance> {
        self.hand.iter().find(|c| c.id == id)
    }

    /// Removes the instance from `pile`, preserving the order of the rest.
    pub fn take(&mut self, pile: Pile, id: InstanceId) -> Option<CardInstance> {
        let cards = self.pile_mut(pile);
        let index = cards.iter().position(|c| c.id == id)?;
        Some(cards.remove(index))
    }

    /// The `count` top cards of the draw pile, topmost first.
    pub fn peek_top(&self, count: usize) -> impl Iterator<Item = &CardInstance> {
        self.draw.iter().rev().take(count)
    }

    pub fn card_count(&self) -> usize {
        Pile::ALL.into_iter().map(|p| self.pile(p).len()).sum()
    }

    pub fn all_cards(&self) -> impl Iterator<Item = &CardInstance> {
        self.draw
            .iter()
            .chain(&self.hand)
            .chain(&self.discard)
            .chain(&self.removed)
    }
}

/// A card on the resolution stack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackEntry {
    pub instance: CardInstance,
    pub team: Team,
    pub target: Option<PlayerId>,
}

/// An asset sitting in the shared play area.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayedCard {
    pub instance: CardInstance,
    pub owner: Team,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamState {
    pub team: Team,
    pub roster: BTreeMap<PlayerId, Player>,
    pub deck: Deck,
}

impl TeamState {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            roster: BTreeMap::new(),
            deck: Deck::default(),
        }
    }

    /// On-court players in id order.
    pub fn on_court(&self) -> impl Iterator<Item = &Player> {
        self.roster.values().filter(|p| p.on_court())
    }

    pub fn bench(&self) -> impl Iterator<Item = &Player> {
        self.roster.values().filter(|p| !p.on_court())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teams {
    pub home: TeamState,
    pub away: TeamState,
}

impl Teams {
    pub fn new() -> Self {
        Self {
            home: TeamState::new(Team::Home),
            away: TeamState::new(Team::Away),
        }
    }

    pub fn get(&self, team: Team) -> &TeamState {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut TeamState {
        match team {
            Team::Home => &mut self.home,
            Team::Away => &mut self.away,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamState> {
        [&self.home, &self.away].into_iter()
    }
}

impl Default for Teams {
    fn default() -> Self {
        Self::new()
    }
}
