//! Effective stat computation.

use crate::config::GameConfig;
use crate::state::{Bonus, Player, Stat};

/// Accumulated bonuses for one stat.
///
/// Flat bonuses are added to the base first, then the summed percentage
/// scales the result (rounded toward negative infinity).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    flat: i32,
    percent: i32,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bonus: Bonus) {
        match bonus {
            Bonus::Flat(n) => self.flat += n,
            Bonus::Percent(p) => self.percent += p,
        }
    }

    pub fn flat(&self) -> i32 {
        self.flat
    }

    pub fn percent(&self) -> i32 {
        self.percent
    }

    pub fn apply(&self, base: i32) -> i32 {
        let flat = base + self.flat;
        (flat * (100 + self.percent)).div_euclid(100)
    }
}

impl Extend<Bonus> for BonusStack {
    fn extend<I: IntoIterator<Item = Bonus>>(&mut self, iter: I) {
        for bonus in iter {
            self.push(bonus);
        }
    }
}

impl FromIterator<Bonus> for BonusStack {
    fn from_iter<I: IntoIterator<Item = Bonus>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

/// Base stat plus the player's modifiers plus any test-specific bonuses.
pub fn effective_stat(player: &Player, stat: Stat, extra: &[Bonus]) -> i32 {
    let stack: BonusStack = player
        .bonuses(stat)
        .chain(extra.iter().copied())
        .collect();
    stack.apply(player.stats.get(stat))
}

/// Target number a fate card must reach.
pub const fn difficulty(effective: i32) -> i32 {
    GameConfig::BASE_DIFFICULTY - effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CardRef, PlayerId, StatModifier, Stats, Team};

    #[test]
    fn flat_bonuses_apply_before_percentages() {
        let stack: BonusStack = [Bonus::Percent(50), Bonus::Flat(1)].into_iter().collect();
        // (3 + 1) * 1.5
        assert_eq!(stack.apply(3), 6);
    }

    #[test]
    fn negative_percentages_round_down() {
        let stack: BonusStack = [Bonus::Percent(-50)].into_iter().collect();
        assert_eq!(stack.apply(3), 1);
    }

    #[test]
    fn effective_stat_reads_modifiers_for_that_stat_only() {
        let mut player = Player::new(PlayerId(1), CardRef::from("guard"), Team::Home, Stats::default());
        player.modifiers.push(StatModifier {
            stat: Stat::Shooting,
            bonus: Bonus::Flat(2),
            expires: None,
        });
        player.modifiers.push(StatModifier {
            stat: Stat::Passing,
            bonus: Bonus::Flat(5),
            expires: None,
        });

        assert_eq!(effective_stat(&player, Stat::Shooting, &[]), 5);
        assert_eq!(effective_stat(&player, Stat::Shooting, &[Bonus::Flat(1)]), 6);
        assert_eq!(difficulty(effective_stat(&player, Stat::Shooting, &[])), 3);
    }
}
