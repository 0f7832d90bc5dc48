//! Skill-test records kept in state while a test is open.

use super::common::{PlayerId, Team};
use super::player::{Bonus, Stat};
use crate::board::Position;

/// Net favourability of a skill test, ordered from worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum AdvantageLevel {
    DoubleDisadvantage,
    Disadvantage,
    Normal,
    Advantage,
    DoubleAdvantage,
}

impl AdvantageLevel {
    pub const fn value(self) -> i32 {
        match self {
            AdvantageLevel::DoubleDisadvantage => -2,
            AdvantageLevel::Disadvantage => -1,
            AdvantageLevel::Normal => 0,
            AdvantageLevel::Advantage => 1,
            AdvantageLevel::DoubleAdvantage => 2,
        }
    }

    /// Level for a signed net value, saturating at the double levels.
    pub const fn from_net(net: i32) -> Self {
        match net {
            i32::MIN..=-2 => AdvantageLevel::DoubleDisadvantage,
            -1 => AdvantageLevel::Disadvantage,
            0 => AdvantageLevel::Normal,
            1 => AdvantageLevel::Advantage,
            _ => AdvantageLevel::DoubleAdvantage,
        }
    }
}

/// One contextual factor feeding a skill test.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvantageSource {
    /// Where the factor came from, e.g. `"distance"` or a card slug.
    pub origin: String,
    pub level: AdvantageLevel,
}

impl AdvantageSource {
    pub fn new(origin: impl Into<String>, level: AdvantageLevel) -> Self {
        Self {
            origin: origin.into(),
            level,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum SkillTestKind {
    Shot,
    Pass { receiver: PlayerId },
    Generic,
}

/// An open skill test accumulating bonuses and advantage sources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingSkillTest {
    pub id: u32,
    pub actor: PlayerId,
    pub team: Team,
    pub stat: Stat,
    pub kind: SkillTestKind,
    /// Hoop for shots, receiver tile for passes.
    pub target: Option<Position>,
    pub bonuses: Vec<Bonus>,
    pub advantage: Vec<AdvantageSource>,
}
