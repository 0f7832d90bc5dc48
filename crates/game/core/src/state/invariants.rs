//! Board and deck consistency checks run after every applied action.
//!
//! These are bug detectors: a correct effect set never produces a
//! violation. The engine rolls the action back if any is found.

use std::collections::BTreeSet;

use super::{BallState, GameState, InstanceId, PlayerId, Position};
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    #[error("occupant {player} at {position} is not rostered")]
    UnknownOccupant { player: PlayerId, position: Position },

    #[error("{player} is recorded at {recorded:?} but occupies {position}")]
    PositionMismatch {
        player: PlayerId,
        position: Position,
        recorded: Option<Position>,
    },

    #[error("{player} occupies more than one tile")]
    DuplicateOccupant { player: PlayerId },

    #[error("{player} is on court at {position} but the tile does not hold them")]
    MissingOccupant { player: PlayerId, position: Position },

    #[error("{0} appears in more than one place")]
    DuplicateCard(InstanceId),

    #[error("ball holder {0} is not on court")]
    HolderOffCourt(PlayerId),

    #[error("loose ball at {0} is off the court")]
    BallOffCourt(Position),
}

impl GameError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownOccupant { .. } => "INVARIANT_UNKNOWN_OCCUPANT",
            Self::PositionMismatch { .. } => "INVARIANT_POSITION_MISMATCH",
            Self::DuplicateOccupant { .. } => "INVARIANT_DUPLICATE_OCCUPANT",
            Self::MissingOccupant { .. } => "INVARIANT_MISSING_OCCUPANT",
            Self::DuplicateCard(_) => "INVARIANT_DUPLICATE_CARD",
            Self::HolderOffCourt(_) => "INVARIANT_HOLDER_OFF_COURT",
            Self::BallOffCourt(_) => "INVARIANT_BALL_OFF_COURT",
        }
    }
}

/// Returns every violation found, or an empty list if the state is sound.
#[must_use]
pub fn check(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut seen_players = BTreeSet::new();
    for (position, id) in state.board.occupants() {
        if !seen_players.insert(id) {
            violations.push(InvariantViolation::DuplicateOccupant { player: id });
        }
        match state.player(id) {
            None => violations.push(InvariantViolation::UnknownOccupant {
                player: id,
                position,
            }),
            Some(player) if player.position != Some(position) => {
                violations.push(InvariantViolation::PositionMismatch {
                    player: id,
                    position,
                    recorded: player.position,
                })
            }
            Some(_) => {}
        }
    }

    for player in state.players() {
        if let Some(position) = player.position
            && state.board.occupant(position) != Some(player.id)
        {
            violations.push(InvariantViolation::MissingOccupant {
                player: player.id,
                position,
            });
        }
    }

    let mut seen_cards = BTreeSet::new();
    let team_cards = state.teams.iter().flat_map(|t| {
        t.deck
            .all_cards()
            .chain(t.roster.values().flat_map(|p| p.attachments.iter()))
    });
    let shared_cards = state
        .play_area
        .iter()
        .map(|c| &c.instance)
        .chain(state.stack.iter().map(|e| &e.instance));
    for card in team_cards.chain(shared_cards) {
        if !seen_cards.insert(card.id) {
            violations.push(InvariantViolation::DuplicateCard(card.id));
        }
    }

    match state.ball {
        BallState::Possessed { holder } => {
            if !state.player(holder).is_some_and(|p| p.on_court()) {
                violations.push(InvariantViolation::HolderOffCourt(holder));
            }
        }
        BallState::Loose { position } => {
            if !state.board.contains(position) {
                violations.push(InvariantViolation::BallOffCourt(position));
            }
        }
        BallState::InAir { .. } => {}
    }

    violations
}
