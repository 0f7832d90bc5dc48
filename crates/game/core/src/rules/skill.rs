//! Skill tests: advantage combination, fate selection and outcomes.
//!
//! A test reveals one to three fate cards depending on the net advantage
//! level and keeps the best (advantage), the worst (disadvantage) or the
//! only one (normal). The kept value must reach `8 - effective stat`.

use crate::board::Position;
use crate::config::GameConfig;
use crate::state::{AdvantageLevel, AdvantageSource, GameState, Player, SkillTestKind};

use super::zoc;

/// Net level of a set of sources: signed levels summed, then clamped.
pub fn combine(sources: &[AdvantageSource]) -> AdvantageLevel {
    let net = sources.iter().map(|s| s.level.value()).sum();
    AdvantageLevel::from_net(net)
}

/// Fate cards revealed at a given level.
pub const fn fate_count(level: AdvantageLevel) -> usize {
    match level {
        AdvantageLevel::Normal => 1,
        AdvantageLevel::Advantage | AdvantageLevel::Disadvantage => 2,
        AdvantageLevel::DoubleAdvantage | AdvantageLevel::DoubleDisadvantage => {
            GameConfig::MAX_FATE_REVEAL
        }
    }
}

/// Which revealed fate value counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Single,
    Best,
    Worst,
}

impl Selection {
    pub const fn for_level(level: AdvantageLevel) -> Self {
        match level {
            AdvantageLevel::Normal => Selection::Single,
            AdvantageLevel::Advantage | AdvantageLevel::DoubleAdvantage => Selection::Best,
            AdvantageLevel::Disadvantage | AdvantageLevel::DoubleDisadvantage => Selection::Worst,
        }
    }

    /// Picks from the revealed values; nothing revealed counts as zero.
    pub fn select(self, revealed: &[i32]) -> i32 {
        let picked = match self {
            Selection::Single => revealed.first().copied(),
            Selection::Best => revealed.iter().copied().max(),
            Selection::Worst => revealed.iter().copied().min(),
        };
        picked.unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillTestResult {
    pub level: AdvantageLevel,
    /// Fate values in reveal order.
    pub revealed: Vec<i32>,
    pub selected: i32,
    pub difficulty: i32,
    pub success: bool,
    /// `selected - difficulty`; negative on failure.
    pub margin: i32,
    pub strong: bool,
}

impl SkillTestResult {
    pub fn new(level: AdvantageLevel, revealed: Vec<i32>, difficulty: i32) -> Self {
        let selected = Selection::for_level(level).select(&revealed);
        let margin = selected - difficulty;
        Self {
            level,
            revealed,
            selected,
            difficulty,
            success: margin >= 0,
            margin,
            strong: margin >= GameConfig::STRONG_SUCCESS_MARGIN,
        }
    }
}

/// Distance at or beyond which a pass is considered long.
const LONG_PASS: u32 = 6;

/// Advantage sources that follow from the court situation alone.
///
/// Shots: close range helps, deep range and each contesting defender hurt.
/// Passes: an unguarded receiver helps, a long or contested lane hurts.
pub fn contextual_advantage(
    state: &GameState,
    config: &GameConfig,
    actor: &Player,
    kind: SkillTestKind,
    target: Option<Position>,
) -> Vec<AdvantageSource> {
    let mut sources = Vec::new();
    let (Some(from), Some(target)) = (actor.position, target) else {
        return sources;
    };
    let distance = from.distance(target);

    match kind {
        SkillTestKind::Shot => {
            if distance <= 1 {
                sources.push(AdvantageSource::new("close-range", AdvantageLevel::Advantage));
            } else if distance >= config.three_point_distance + 2 {
                sources.push(AdvantageSource::new("deep-range", AdvantageLevel::Disadvantage));
            }
            for _ in zoc::shot_contesters(state, actor) {
                sources.push(AdvantageSource::new("contested", AdvantageLevel::Disadvantage));
            }
        }
        SkillTestKind::Pass { .. } => {
            if distance >= LONG_PASS {
                sources.push(AdvantageSource::new("long-pass", AdvantageLevel::Disadvantage));
            }
            if !zoc::pass_interceptors(state, actor, from, target).is_empty() {
                sources.push(AdvantageSource::new(
                    "contested-lane",
                    AdvantageLevel::Disadvantage,
                ));
            } else if zoc::controllers(state, actor, target).next().is_none() {
                sources.push(AdvantageSource::new("open-receiver", AdvantageLevel::Advantage));
            }
        }
        SkillTestKind::Generic => {}
    }
    sources
}
