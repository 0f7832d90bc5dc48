//! Player placement, exhaustion and stat modifiers.

use crate::effect::{AppliedValue, EffectError, Executor};
use crate::state::{BallState, Expiry, PlayerId, Position, StatModifier, Team};

impl Executor<'_> {
    /// Moves an on-court player; the ball travels with its holder.
    pub(super) fn move_player(
        &mut self,
        id: PlayerId,
        to: Position,
    ) -> Result<AppliedValue, EffectError> {
        let from = self
            .player_ref(id)?
            .position
            .ok_or(EffectError::PlayerOffCourt(id))?;
        self.state.board.relocate(id, from, to)?;
        self.player_mut(id)?.position = Some(to);
        Ok(AppliedValue::Moved {
            player: id,
            from,
            to,
        })
    }

    pub(super) fn place_player(
        &mut self,
        id: PlayerId,
        at: Position,
    ) -> Result<AppliedValue, EffectError> {
        if self.player_ref(id)?.on_court() {
            return Err(EffectError::PlayerOnCourt(id));
        }
        self.state.board.place(at, id)?;
        self.player_mut(id)?.position = Some(at);
        Ok(AppliedValue::Placed { player: id, at })
    }

    /// Sends a player to the bench. A ball they held drops where they stood.
    pub(super) fn remove_from_court(&mut self, id: PlayerId) -> Result<AppliedValue, EffectError> {
        let from = self
            .player_ref(id)?
            .position
            .ok_or(EffectError::PlayerOffCourt(id))?;
        self.state.board.vacate(from);
        self.player_mut(id)?.position = None;
        if self.state.ball.holder() == Some(id) {
            self.state.ball = BallState::Loose { position: from };
        }
        Ok(AppliedValue::Benched { player: id, from })
    }

    pub(super) fn exhaust_player(&mut self, id: PlayerId) -> Result<AppliedValue, EffectError> {
        self.player_mut(id)?.exhausted = true;
        Ok(AppliedValue::Exhausted(id))
    }

    pub(super) fn refresh_player(&mut self, id: PlayerId) -> Result<AppliedValue, EffectError> {
        let player = self.player_mut(id)?;
        let refreshed = usize::from(player.exhausted);
        player.exhausted = false;
        Ok(AppliedValue::Refreshed { players: refreshed })
    }

    pub(super) fn refresh_team(&mut self, team: Team) -> AppliedValue {
        let mut refreshed = 0;
        for player in self.state.team_mut(team).roster.values_mut() {
            if player.exhausted {
                player.exhausted = false;
                refreshed += 1;
            }
        }
        AppliedValue::Refreshed { players: refreshed }
    }

    pub(super) fn add_modifier(
        &mut self,
        id: PlayerId,
        modifier: StatModifier,
    ) -> Result<AppliedValue, EffectError> {
        self.player_mut(id)?.modifiers.push(modifier);
        Ok(AppliedValue::ModifierAdded(id))
    }

    pub(super) fn expire_modifiers(&mut self, expiry: Expiry) -> AppliedValue {
        let mut count = 0;
        for team in Team::ALL {
            for player in self.state.team_mut(team).roster.values_mut() {
                let before = player.modifiers.len();
                player.modifiers.retain(|m| m.expires != Some(expiry));
                count += before - player.modifiers.len();
            }
        }
        AppliedValue::ModifiersExpired { count }
    }
}
