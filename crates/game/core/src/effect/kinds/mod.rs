//! Primitive effect handlers.
//!
//! Every handler resolves its parameters, validates against the working
//! state and only then mutates it. An `Err` return means nothing changed.
mod ball;
mod cards;
mod choice;
mod events;
mod players;
mod skill;
mod turn;

use super::{AppliedValue, Effect, EffectError, Executor};
use crate::state::{Bindings, Player, PlayerId};

impl Executor<'_> {
    pub(crate) fn apply_primitive(
        &mut self,
        effect: &Effect,
        bindings: &Bindings,
    ) -> Result<AppliedValue, EffectError> {
        match effect {
            // players
            Effect::MovePlayer { player, to } => {
                self.move_player(player.resolve(bindings)?, to.resolve(bindings)?)
            }
            Effect::PlacePlayer { player, at } => {
                self.place_player(player.resolve(bindings)?, at.resolve(bindings)?)
            }
            Effect::RemoveFromCourt { player } => self.remove_from_court(player.resolve(bindings)?),
            Effect::ExhaustPlayer { player } => self.exhaust_player(player.resolve(bindings)?),
            Effect::RefreshPlayer { player } => self.refresh_player(player.resolve(bindings)?),
            Effect::RefreshTeam { team } => Ok(self.refresh_team(team.resolve(bindings)?)),
            Effect::AddModifier { player, modifier } => {
                self.add_modifier(player.resolve(bindings)?, *modifier)
            }
            Effect::ExpireModifiers(expiry) => Ok(self.expire_modifiers(*expiry)),

            // cards
            Effect::DrawCards { team, count } => {
                self.draw_cards(team.resolve(bindings)?, count.resolve(bindings)?)
            }
            Effect::DiscardCard { team, card } => {
                self.discard_card(team.resolve(bindings)?, card.resolve(bindings)?)
            }
            Effect::ShuffleDeck { team } => Ok(self.shuffle_deck(team.resolve(bindings)?)),
            Effect::PushStack { team, card, target } => {
                let target = target.as_ref().map(|t| t.resolve(bindings)).transpose()?;
                self.push_stack(team.resolve(bindings)?, card.resolve(bindings)?, target)
            }
            Effect::ResolveStackTop => self.resolve_stack_top(),
            Effect::AttachCard { team, card, player } => self.attach_card(
                team.resolve(bindings)?,
                card.resolve(bindings)?,
                player.resolve(bindings)?,
            ),
            Effect::PlayAsset { team, card } => {
                self.play_asset(team.resolve(bindings)?, card.resolve(bindings)?)
            }
            Effect::RemoveFromPlay { card } => self.remove_from_play(card.resolve(bindings)?),
            Effect::RegisterTrigger(spec) => self.register_trigger(spec, bindings),

            // ball & score
            Effect::GiveBall { player } => self.give_ball(player.resolve(bindings)?),
            Effect::LooseBall { at } => self.loose_ball(at.resolve(bindings)?),
            Effect::LaunchBall { from, to, kind } => {
                self.launch_ball(from.resolve(bindings)?, to.resolve(bindings)?, *kind)
            }
            Effect::AddScore { team, points } => {
                self.add_score(team.resolve(bindings)?, points.resolve(bindings)?)
            }

            // turn structure
            Effect::SetPhase(phase) => Ok(self.set_phase(*phase)),
            Effect::SetActiveTeam { team } => Ok(self.set_active_team(team.resolve(bindings)?)),
            Effect::AdvanceTurn => Ok(self.advance_turn()),

            // events
            Effect::Prevent => self.prevent(),
            Effect::AdjustEvent { key, adjustment } => self.adjust_event(key, adjustment, bindings),

            // skill tests
            Effect::InitiateSkillTest { actor, stat, test } => {
                self.initiate_skill_test(actor.resolve(bindings)?, *stat, test, bindings)
            }
            Effect::AddSkillBonus(bonus) => self.add_skill_bonus(*bonus),
            Effect::AddAdvantage(source) => self.add_advantage(source.clone()),

            Effect::Noop => Ok(AppliedValue::None),

            // interpreted by `Executor::run` before reaching here
            Effect::Sequence(_)
            | Effect::Scoped { .. }
            | Effect::Conditional { .. }
            | Effect::FireEvent(_)
            | Effect::OfferChoice { .. }
            | Effect::SubmitChoice { .. }
            | Effect::ExecuteChoiceContinuation
            | Effect::ResolveSkillTest => Ok(AppliedValue::None),
        }
    }

    pub(crate) fn player_ref(&self, id: PlayerId) -> Result<&Player, EffectError> {
        self.state.player(id).ok_or(EffectError::UnknownPlayer(id))
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, EffectError> {
        self.state
            .player_mut(id)
            .ok_or(EffectError::UnknownPlayer(id))
    }
}
