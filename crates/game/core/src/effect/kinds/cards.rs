//! Deck piles, the resolution stack and cards in play.

use tracing::debug;

use crate::config::GameConfig;
use crate::effect::{AppliedValue, EffectError, Executor};
use crate::env::{CardDefinition, TriggerSpec, compute_seed, shuffle};
use crate::state::{
    Bindings, CardInstance, InstanceId, Pile, PlayedCard, PlayerId, StackEntry, Team, names,
};
use crate::trigger::{Provenance, SourceId};

/// Salt separating the two teams' shuffles within one tick.
fn team_salt(team: Team) -> u32 {
    match team {
        Team::Home => 1,
        Team::Away => 2,
    }
}

impl Executor<'_> {
    /// Shuffles `team`'s draw pile in place.
    ///
    /// The seed mixes the game seed, the logical clock and a running shuffle
    /// count, so every shuffle in a game gets a distinct permutation.
    fn shuffle_draw_pile(&mut self, team: Team) {
        let seed = compute_seed(
            self.state.game_seed,
            self.state.clock.0,
            team_salt(team),
            self.state.shuffles,
        );
        self.state.shuffles += 1;
        let rng = self.env.rng();
        shuffle(rng, seed, &mut self.state.team_mut(team).deck.draw);
    }

    /// Moves the discard pile under the draw pile after shuffling it.
    ///
    /// Returns false if there was nothing to recycle.
    pub(super) fn recycle_discard(&mut self, team: Team) -> bool {
        let deck = &mut self.state.team_mut(team).deck;
        if deck.discard.is_empty() {
            return false;
        }
        let mut recycled = std::mem::take(&mut deck.discard);
        recycled.append(&mut deck.draw);
        deck.draw = recycled;
        self.shuffle_draw_pile(team);
        debug!(target: "hexball::effect", %team, "discard pile reshuffled into draw pile");
        true
    }

    fn hand_card(&self, team: Team, card: InstanceId) -> Result<&CardInstance, EffectError> {
        self.state
            .team(team)
            .deck
            .in_hand(card)
            .ok_or(EffectError::CardNotFound {
                team,
                card,
                pile: "hand",
            })
    }

    fn hand_card_definition(
        &self,
        team: Team,
        card: InstanceId,
    ) -> Result<&CardDefinition, EffectError> {
        let slug = &self.hand_card(team, card)?.card;
        Ok(self.env.card(slug)?)
    }

    fn take_from_hand(&mut self, team: Team, card: InstanceId) -> Result<CardInstance, EffectError> {
        self.state
            .team_mut(team)
            .deck
            .take(Pile::Hand, card)
            .ok_or(EffectError::CardNotFound {
                team,
                card,
                pile: "hand",
            })
    }

    fn register_card_triggers(&mut self, triggers: &[TriggerSpec], provenance: &Provenance) -> usize {
        for spec in triggers {
            self.triggers
                .registry
                .insert(spec.to_trigger(provenance.clone()));
        }
        triggers.len()
    }

    pub(super) fn draw_cards(&mut self, team: Team, count: i64) -> Result<AppliedValue, EffectError> {
        let count = u32::try_from(count)
            .ok()
            .filter(|n| *n <= GameConfig::MAX_DRAW)
            .ok_or(EffectError::TooManyCards(count))?;

        let mut cards = Vec::new();
        let mut reshuffled = false;
        for _ in 0..count {
            if self.state.team(team).deck.draw.is_empty() {
                if !self.recycle_discard(team) {
                    break;
                }
                reshuffled = true;
            }
            let deck = &mut self.state.team_mut(team).deck;
            if let Some(card) = deck.draw.pop() {
                cards.push(card.id);
                deck.hand.push(card);
            }
        }
        Ok(AppliedValue::Drew {
            team,
            cards,
            reshuffled,
        })
    }

    pub(super) fn discard_card(
        &mut self,
        team: Team,
        card: InstanceId,
    ) -> Result<AppliedValue, EffectError> {
        let instance = self.take_from_hand(team, card)?;
        self.state.team_mut(team).deck.discard.push(instance);
        Ok(AppliedValue::Discarded { team, card })
    }

    pub(super) fn shuffle_deck(&mut self, team: Team) -> AppliedValue {
        self.shuffle_draw_pile(team);
        AppliedValue::Shuffled(team)
    }

    pub(super) fn push_stack(
        &mut self,
        team: Team,
        card: InstanceId,
        target: Option<PlayerId>,
    ) -> Result<AppliedValue, EffectError> {
        if let Some(target) = target {
            self.player_ref(target)?;
        }
        let instance = self.take_from_hand(team, card)?;
        self.state.stack.push(StackEntry {
            instance,
            team,
            target,
        });
        Ok(AppliedValue::Stacked(card))
    }

    pub(super) fn resolve_stack_top(&mut self) -> Result<AppliedValue, EffectError> {
        let entry = self.state.stack.pop().ok_or(EffectError::EmptyStack)?;
        let card = entry.instance.id;
        self.state.team_mut(entry.team).deck.discard.push(entry.instance);
        Ok(AppliedValue::StackResolved(card))
    }

    /// Moves every card still on the stack to its owner's discard pile.
    pub(super) fn fizzle_stack(&mut self) {
        for entry in std::mem::take(&mut self.state.stack) {
            let card = entry.instance.id;
            self.state.team_mut(entry.team).deck.discard.push(entry.instance);
            self.record("resolve-stack-top", AppliedValue::StackResolved(card));
        }
    }

    /// Attaches an ability from hand to a player and registers its triggers.
    pub(super) fn attach_card(
        &mut self,
        team: Team,
        card: InstanceId,
        player: PlayerId,
    ) -> Result<AppliedValue, EffectError> {
        self.player_ref(player)?;
        let triggers = self.hand_card_definition(team, card)?.triggers.clone();
        let instance = self.take_from_hand(team, card)?;
        self.player_mut(player)?.attachments.push(instance);

        let provenance = Provenance::card(card, team, Some(player));
        let triggers = self.register_card_triggers(&triggers, &provenance);
        Ok(AppliedValue::Attached {
            card,
            player,
            triggers,
        })
    }

    /// Puts an asset from hand into the play area and registers its triggers.
    pub(super) fn play_asset(
        &mut self,
        team: Team,
        card: InstanceId,
    ) -> Result<AppliedValue, EffectError> {
        let triggers = self.hand_card_definition(team, card)?.triggers.clone();
        let instance = self.take_from_hand(team, card)?;
        self.state.play_area.push(PlayedCard {
            instance,
            owner: team,
        });

        let provenance = Provenance::card(card, team, None);
        let triggers = self.register_card_triggers(&triggers, &provenance);
        Ok(AppliedValue::AssetPlayed { card, triggers })
    }

    /// Discards an attached or in-play card and drops every trigger it registered.
    pub(super) fn remove_from_play(&mut self, card: InstanceId) -> Result<AppliedValue, EffectError> {
        let (owner, instance) = if let Some(index) = self
            .state
            .play_area
            .iter()
            .position(|c| c.instance.id == card)
        {
            let played = self.state.play_area.remove(index);
            (played.owner, played.instance)
        } else {
            self.detach(card)?
        };

        self.state.team_mut(owner).deck.discard.push(instance);
        let triggers = self
            .triggers
            .registry
            .remove_source(&SourceId::Card(card));
        Ok(AppliedValue::LeftPlay { card, triggers })
    }

    fn detach(&mut self, card: InstanceId) -> Result<(Team, CardInstance), EffectError> {
        for team in Team::ALL {
            for player in self.state.team_mut(team).roster.values_mut() {
                if let Some(index) = player.attachments.iter().position(|c| c.id == card) {
                    return Ok((team, player.attachments.remove(index)));
                }
            }
        }
        Err(EffectError::CardNotInPlay(card))
    }

    /// Registers a trigger owned by whatever is bound as `card`, `self` and `owner`.
    pub(super) fn register_trigger(
        &mut self,
        spec: &TriggerSpec,
        bindings: &Bindings,
    ) -> Result<AppliedValue, EffectError> {
        let owner = bindings
            .team(names::OWNER)
            .ok_or_else(|| EffectError::UnboundParameter {
                name: names::OWNER.into(),
            })?;
        let player = bindings.player(names::SELF);
        let provenance = match (bindings.card(names::CARD), player) {
            (Some(card), player) => Provenance::card(card, owner, player),
            (None, Some(player)) => {
                Provenance::new(SourceId::Player(player), owner).for_player(player)
            }
            (None, None) => Provenance::new(SourceId::Named(owner.to_string()), owner),
        };
        let id = self.triggers.registry.insert(spec.to_trigger(provenance));
        Ok(AppliedValue::TriggerRegistered(id))
    }
}
