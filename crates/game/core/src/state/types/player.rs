//! Roster entries and their stats.

use super::common::{CardRef, PlayerId, Team};
use super::deck::CardInstance;
use crate::board::Position;

/// Body size; compared when resolving ZoC penalties and size match-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum Size {
    Small,
    Medium,
    Large,
}

/// Stats that skill tests and movement read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum Stat {
    Speed,
    Shooting,
    Passing,
    Dribbling,
    Defense,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub size: Size,
    pub speed: i32,
    pub shooting: i32,
    pub passing: i32,
    pub dribbling: i32,
    pub defense: i32,
}

impl Stats {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Speed => self.speed,
            Stat::Shooting => self.shooting,
            Stat::Passing => self.passing,
            Stat::Dribbling => self.dribbling,
            Stat::Defense => self.defense,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            size: Size::Medium,
            speed: 3,
            shooting: 3,
            passing: 3,
            dribbling: 3,
            defense: 3,
        }
    }
}

/// A single bonus contribution to a stat.
///
/// Flat bonuses are summed before percentage bonuses scale the total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    Flat(i32),
    /// Percentage points; `Percent(50)` multiplies by 1.5.
    Percent(i32),
}

/// When a temporary modifier falls off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expiry {
    EndOfTurn,
    EndOfQuarter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: Stat,
    pub bonus: Bonus,
    /// `None` lasts for the rest of the game.
    pub expires: Option<Expiry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub card: CardRef,
    pub team: Team,
    /// `None` while on the bench.
    pub position: Option<Position>,
    pub exhausted: bool,
    pub stats: Stats,
    pub modifiers: Vec<StatModifier>,
    pub attachments: Vec<CardInstance>,
}

impl Player {
    pub fn new(id: PlayerId, card: CardRef, team: Team, stats: Stats) -> Self {
        Self {
            id,
            card,
            team,
            position: None,
            exhausted: false,
            stats,
            modifiers: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn on_court(&self) -> bool {
        self.position.is_some()
    }

    pub fn size(&self) -> Size {
        self.stats.size
    }

    /// Modifiers currently applying to `stat`.
    pub fn bonuses(&self, stat: Stat) -> impl Iterator<Item = Bonus> + '_ {
        self.modifiers
            .iter()
            .filter(move |m| m.stat == stat)
            .map(|m| m.bonus)
    }
}
