//! Player-facing actions.
//!
//! An [`Action`] is the only way callers change a game. Each one is checked
//! against the schema, then the policy for its [`ActionType`], and finally
//! decomposed into the request event whose default rule does the work.
mod schema;

pub use schema::{SchemaError, validate};

use crate::effect::{Effect, EventTemplate, Param};
use crate::state::{ChoiceId, GameState, InstanceId, PlayerId, Position, Team};
use crate::trigger::{EventKind, RequestEvent, keys};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Leaves setup: shuffles, deals opening hands and tips off.
    StartGame { possession: Team },
    MovePlayer { player: PlayerId, to: Position },
    Pass { player: PlayerId, receiver: PlayerId },
    Shoot { player: PlayerId },
    /// Takes a loose ball from the player's own or an adjacent tile.
    PickUpBall { player: PlayerId },
    PlayCard {
        team: Team,
        card: InstanceId,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<PlayerId>,
    },
    /// Swaps an on-court player for a bench player on the same tile.
    Substitute { out: PlayerId, incoming: PlayerId },
    DrawCards { team: Team, count: u32 },
    DiscardCard { team: Team, card: InstanceId },
    /// Picks an option of the pending choice and resumes its continuation.
    ResolveChoice { choice: ChoiceId, option: u32 },
    EndTurn,
}

/// Discriminant of [`Action`]; policies are registered per type.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum ActionType {
    StartGame,
    MovePlayer,
    Pass,
    Shoot,
    PickUpBall,
    PlayCard,
    Substitute,
    DrawCards,
    DiscardCard,
    ResolveChoice,
    EndTurn,
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::StartGame { .. } => ActionType::StartGame,
            Action::MovePlayer { .. } => ActionType::MovePlayer,
            Action::Pass { .. } => ActionType::Pass,
            Action::Shoot { .. } => ActionType::Shoot,
            Action::PickUpBall { .. } => ActionType::PickUpBall,
            Action::PlayCard { .. } => ActionType::PlayCard,
            Action::Substitute { .. } => ActionType::Substitute,
            Action::DrawCards { .. } => ActionType::DrawCards,
            Action::DiscardCard { .. } => ActionType::DiscardCard,
            Action::ResolveChoice { .. } => ActionType::ResolveChoice,
            Action::EndTurn => ActionType::EndTurn,
        }
    }

    /// The player performing the action, for player actions.
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            Action::MovePlayer { player, .. }
            | Action::Pass { player, .. }
            | Action::Shoot { player }
            | Action::PickUpBall { player } => Some(*player),
            Action::Substitute { out, .. } => Some(*out),
            _ => None,
        }
    }

    /// The team the action is taken for.
    pub fn team(&self, state: &GameState) -> Option<Team> {
        match self {
            Action::StartGame { possession } => Some(*possession),
            Action::PlayCard { team, .. }
            | Action::DrawCards { team, .. }
            | Action::DiscardCard { team, .. } => Some(*team),
            Action::ResolveChoice { .. } => state.pending_choice.as_ref().map(|c| c.team),
            Action::EndTurn => Some(state.active_team),
            _ => self.actor().and_then(|id| state.player(id)).map(|p| p.team),
        }
    }

    /// The request event this action decomposes into.
    ///
    /// `None` for [`Action::ResolveChoice`], which resumes a parked
    /// continuation instead of firing a new event.
    pub fn request(&self, state: &GameState) -> Option<RequestEvent> {
        let event = match self {
            Action::StartGame { possession } => {
                RequestEvent::new(EventKind::GameStart).for_team(*possession)
            }
            Action::MovePlayer { player, to } => {
                let mut event = RequestEvent::new(EventKind::MovePlayer)
                    .by_player(*player)
                    .with(keys::TO, *to)
                    .with(keys::EXHAUSTS, true);
                if let Some(from) = state.player(*player).and_then(|p| p.position) {
                    event = event.with(keys::FROM, from);
                }
                event
            }
            Action::Pass { player, receiver } => RequestEvent::new(EventKind::Pass)
                .by_player(*player)
                .with(keys::RECEIVER, *receiver),
            Action::Shoot { player } => RequestEvent::new(EventKind::Shoot).by_player(*player),
            Action::PickUpBall { player } => {
                RequestEvent::new(EventKind::PickUpBall).by_player(*player)
            }
            Action::PlayCard { team, card, target } => {
                let mut event = RequestEvent::new(EventKind::PlayCard)
                    .for_team(*team)
                    .with(keys::CARD, *card);
                if let Some(target) = target {
                    event = event.with(keys::TARGET, *target);
                }
                event
            }
            Action::Substitute { out, incoming } => RequestEvent::new(EventKind::Substitute)
                .by_player(*out)
                .with(keys::INCOMING, *incoming),
            Action::DrawCards { team, count } => RequestEvent::new(EventKind::DrawCards)
                .for_team(*team)
                .with(keys::COUNT, i64::from(*count)),
            Action::DiscardCard { team, card } => RequestEvent::new(EventKind::DiscardCard)
                .for_team(*team)
                .with(keys::CARD, *card),
            Action::EndTurn => RequestEvent::new(EventKind::TurnEnd).for_team(state.active_team),
            Action::ResolveChoice { .. } => return None,
        };

        Some(match (event.team, self.team(state)) {
            (None, Some(team)) => event.for_team(team),
            _ => event,
        })
    }

    /// The root effect the engine runs for this action.
    pub fn root_effect(&self, state: &GameState) -> Effect {
        match self {
            Action::ResolveChoice { choice, option } => Effect::sequence([
                Effect::SubmitChoice {
                    choice: Some(*choice),
                    option: Param::Value(i64::from(*option)),
                },
                Effect::ExecuteChoiceContinuation,
            ]),
            _ => match self.request(state) {
                Some(event) => Effect::fire(EventTemplate::from_event(&event)),
                None => Effect::Noop,
            },
        }
    }
}
