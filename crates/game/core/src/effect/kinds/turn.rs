use tracing::debug;

use crate::effect::{AppliedValue, Executor};
use crate::state::{Expiry, Phase, Team};

impl Executor<'_> {
    pub(super) fn set_phase(&mut self, phase: Phase) -> AppliedValue {
        self.state.phase = phase;
        AppliedValue::PhaseSet(phase)
    }

    pub(super) fn set_active_team(&mut self, team: Team) -> AppliedValue {
        self.state.active_team = team;
        AppliedValue::ActiveTeam(team)
    }

    /// Hands the turn to the other team.
    ///
    /// Every `turns_per_quarter` turns the quarter ends: quarter-long modifiers
    /// expire and the quarter advances, or the game ends after the last one.
    pub(super) fn advance_turn(&mut self) -> AppliedValue {
        let config = self.env.config();
        let per_quarter = config.turns_per_quarter.max(1);

        if self.state.turn % per_quarter == 0 {
            self.expire_modifiers(Expiry::EndOfQuarter);
            let state = &mut self.state;
            if state.quarter >= config.quarters {
                state.phase = Phase::GameOver;
                debug!(
                    target: "hexball::effect",
                    home = state.score.home,
                    away = state.score.away,
                    "final quarter over"
                );
                return AppliedValue::TurnAdvanced {
                    turn: state.turn,
                    quarter: state.quarter,
                };
            }
            state.quarter += 1;
        }

        let state = &mut self.state;
        state.turn += 1;
        state.active_team = state.active_team.opponent();
        AppliedValue::TurnAdvanced {
            turn: state.turn,
            quarter: state.quarter,
        }
    }
}
