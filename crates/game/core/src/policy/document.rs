//! Facts extracted from a state and a proposed action.

use std::collections::BTreeMap;

use crate::action::Action;
use crate::rules::zoc;
use crate::state::{GameState, Phase, Player, PlayerId};

/// Names of the facts policies can constrain.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum FactKey {
    /// The game has left setup.
    Started,
    /// Phase is `Actions`.
    ActionPhase,
    /// The acting team is the active team.
    ActiveTeam,
    /// The acting player is on court (for `Substitute`, the incoming player).
    OnCourt,
    /// The substituted player is on court.
    OutgoingOnCourt,
    Exhausted,
    HoldsBall,
    BallLoose,
    /// Hex distance from the actor to a loose ball.
    BallDistance,
    /// The move destination is reachable with the actor's movement.
    Reachable,
    ReceiverOnCourt,
    CardInHand,
    TargetOnCourt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactValue {
    Bool(bool),
    Int(i64),
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Int(value)
    }
}

impl core::fmt::Display for FactValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{b}"),
            FactValue::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Append-only fact set: the first value recorded for a key sticks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyDocument {
    facts: BTreeMap<FactKey, FactValue>,
}

impl PolicyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fact; returns false if the key was already set.
    pub fn insert(&mut self, key: FactKey, value: impl Into<FactValue>) -> bool {
        if self.facts.contains_key(&key) {
            return false;
        }
        self.facts.insert(key, value.into());
        true
    }

    #[must_use]
    pub fn with(mut self, key: FactKey, value: impl Into<FactValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: FactKey) -> Option<FactValue> {
        self.facts.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Facts relevant to `action` in `state`.
    ///
    /// Facts about players or cards that do not exist are left absent.
    pub fn for_action(state: &GameState, action: &Action) -> Self {
        let mut doc = Self::new()
            .with(FactKey::Started, state.phase != Phase::Setup)
            .with(FactKey::ActionPhase, state.phase == Phase::Actions);
        if let Some(team) = action.team(state) {
            doc.insert(FactKey::ActiveTeam, team == state.active_team);
        }

        match action {
            Action::MovePlayer { player, to } => {
                if let Some(actor) = doc.actor(state, *player) {
                    doc.insert(FactKey::Reachable, zoc::can_reach(state, actor, *to));
                }
            }
            Action::Pass { player, receiver } => {
                if let Some(actor) = doc.actor(state, *player) {
                    doc.insert(FactKey::HoldsBall, state.ball.holder() == Some(actor.id));
                }
                if let Some(receiver) = state.player(*receiver) {
                    doc.insert(FactKey::ReceiverOnCourt, receiver.on_court());
                }
            }
            Action::Shoot { player } => {
                if let Some(actor) = doc.actor(state, *player) {
                    doc.insert(FactKey::HoldsBall, state.ball.holder() == Some(actor.id));
                }
            }
            Action::PickUpBall { player } => {
                let loose = state.ball.loose_at();
                doc.insert(FactKey::BallLoose, loose.is_some());
                if let Some(actor) = doc.actor(state, *player)
                    && let (Some(at), Some(ball)) = (actor.position, loose)
                {
                    doc.insert(FactKey::BallDistance, i64::from(at.distance(ball)));
                }
            }
            Action::PlayCard { team, card, target } => {
                doc.insert(
                    FactKey::CardInHand,
                    state.team(*team).deck.in_hand(*card).is_some(),
                );
                // Untargeted plays have nothing to check.
                match target {
                    None => {
                        doc.insert(FactKey::TargetOnCourt, true);
                    }
                    Some(id) => {
                        if let Some(target) = state.player(*id) {
                            doc.insert(FactKey::TargetOnCourt, target.on_court());
                        }
                    }
                }
            }
            Action::DiscardCard { team, card } => {
                doc.insert(
                    FactKey::CardInHand,
                    state.team(*team).deck.in_hand(*card).is_some(),
                );
            }
            Action::Substitute { out, incoming } => {
                if let Some(out) = state.player(*out) {
                    doc.insert(FactKey::OutgoingOnCourt, out.on_court());
                }
                if let Some(incoming) = state.player(*incoming) {
                    doc.insert(FactKey::OnCourt, incoming.on_court());
                }
            }
            Action::StartGame { .. }
            | Action::DrawCards { .. }
            | Action::ResolveChoice { .. }
            | Action::EndTurn => {}
        }
        doc
    }

    /// Records the actor facts shared by player actions.
    fn actor<'s>(&mut self, state: &'s GameState, id: PlayerId) -> Option<&'s Player> {
        let player = state.player(id)?;
        self.insert(FactKey::OnCourt, player.on_court());
        self.insert(FactKey::Exhausted, player.exhausted);
        Some(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_sticks() {
        let mut doc = PolicyDocument::new();
        assert!(doc.insert(FactKey::Exhausted, true));
        assert!(!doc.insert(FactKey::Exhausted, false));
        assert_eq!(doc.get(FactKey::Exhausted), Some(FactValue::Bool(true)));
        assert_eq!(doc.get(FactKey::OnCourt), None);
    }
}
