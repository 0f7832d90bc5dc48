use crate::effect::{AppliedValue, EffectError, Executor};
use crate::state::{BallState, FlightKind, PlayerId, Position, Team};

impl Executor<'_> {
    pub(super) fn give_ball(&mut self, id: PlayerId) -> Result<AppliedValue, EffectError> {
        if !self.player_ref(id)?.on_court() {
            return Err(EffectError::PlayerOffCourt(id));
        }
        self.state.ball = BallState::Possessed { holder: id };
        Ok(AppliedValue::Ball(self.state.ball))
    }

    pub(super) fn loose_ball(&mut self, at: Position) -> Result<AppliedValue, EffectError> {
        if !self.state.board.contains(at) {
            return Err(crate::board::BoardError::OffBoard(at).into());
        }
        self.state.ball = BallState::Loose { position: at };
        Ok(AppliedValue::Ball(self.state.ball))
    }

    pub(super) fn launch_ball(
        &mut self,
        origin: Position,
        target: Position,
        kind: FlightKind,
    ) -> Result<AppliedValue, EffectError> {
        for end in [origin, target] {
            if !self.state.board.contains(end) {
                return Err(crate::board::BoardError::OffBoard(end).into());
            }
        }
        self.state.ball = BallState::InAir {
            origin,
            target,
            kind,
        };
        Ok(AppliedValue::Ball(self.state.ball))
    }

    /// Adds one to three points.
    pub(super) fn add_score(&mut self, team: Team, points: i64) -> Result<AppliedValue, EffectError> {
        let points = u32::try_from(points)
            .ok()
            .filter(|p| (1..=3).contains(p))
            .ok_or(EffectError::InvalidPoints(points))?;
        self.state.score.add(team, points);
        Ok(AppliedValue::Scored { team, points })
    }
}
