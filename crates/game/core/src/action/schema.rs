//! Structural validation of an action against the current state.
//!
//! Schema checks answer "does this action refer to things that exist": known
//! players, cards the team actually holds, tiles on the court. Whether the
//! action is allowed right now is the policy layer's job.

use super::Action;
use crate::board::Position;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, InstanceId, Pile, PlayerId, Team};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaError {
    #[error("{0} is not on any roster")]
    UnknownPlayer(PlayerId),

    #[error("{card} does not belong to {team}")]
    UnknownCard { team: Team, card: InstanceId },

    #[error("{card} is in the {team} {pile} pile, not in hand")]
    NotInHand {
        team: Team,
        card: InstanceId,
        pile: Pile,
    },

    #[error("position {0} is not on the court")]
    OffBoard(Position),

    #[error("{player} does not play for {team}")]
    WrongTeam { player: PlayerId, team: Team },

    #[error("{0} cannot target themselves")]
    SelfTarget(PlayerId),

    #[error("draw count {0} is outside 1..={max}", max = GameConfig::MAX_DRAW)]
    DrawCount(u32),
}

impl GameError for SchemaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownPlayer(_) => "SCHEMA_UNKNOWN_PLAYER",
            Self::UnknownCard { .. } => "SCHEMA_UNKNOWN_CARD",
            Self::NotInHand { .. } => "SCHEMA_NOT_IN_HAND",
            Self::OffBoard(_) => "SCHEMA_OFF_BOARD",
            Self::WrongTeam { .. } => "SCHEMA_WRONG_TEAM",
            Self::SelfTarget(_) => "SCHEMA_SELF_TARGET",
            Self::DrawCount(_) => "SCHEMA_DRAW_COUNT",
        }
    }
}

fn team_of(state: &GameState, player: PlayerId) -> Result<Team, SchemaError> {
    state
        .player(player)
        .map(|p| p.team)
        .ok_or(SchemaError::UnknownPlayer(player))
}

fn same_team(state: &GameState, a: PlayerId, b: PlayerId) -> Result<(), SchemaError> {
    let team = team_of(state, a)?;
    if team_of(state, b)? != team {
        return Err(SchemaError::WrongTeam { player: b, team });
    }
    Ok(())
}

fn in_hand(state: &GameState, team: Team, card: InstanceId) -> Result<(), SchemaError> {
    match state.team(team).deck.locate(card) {
        Some(Pile::Hand) => Ok(()),
        Some(pile) => Err(SchemaError::NotInHand { team, card, pile }),
        None => Err(SchemaError::UnknownCard { team, card }),
    }
}

/// Checks that every reference in `action` resolves against `state`.
///
/// # Errors
///
/// The first reference that does not resolve.
pub fn validate(action: &Action, state: &GameState) -> Result<(), SchemaError> {
    match action {
        Action::StartGame { .. } | Action::EndTurn | Action::ResolveChoice { .. } => Ok(()),
        Action::MovePlayer { player, to } => {
            team_of(state, *player)?;
            if !state.board.contains(*to) {
                return Err(SchemaError::OffBoard(*to));
            }
            Ok(())
        }
        Action::Pass { player, receiver } => {
            if player == receiver {
                return Err(SchemaError::SelfTarget(*player));
            }
            same_team(state, *player, *receiver)
        }
        Action::Shoot { player } | Action::PickUpBall { player } => {
            team_of(state, *player).map(|_| ())
        }
        Action::PlayCard { team, card, target } => {
            in_hand(state, *team, *card)?;
            if let Some(target) = target {
                team_of(state, *target)?;
            }
            Ok(())
        }
        Action::Substitute { out, incoming } => {
            if out == incoming {
                return Err(SchemaError::SelfTarget(*out));
            }
            same_team(state, *out, *incoming)
        }
        Action::DrawCards { count, .. } => {
            if *count == 0 || *count > GameConfig::MAX_DRAW {
                return Err(SchemaError::DrawCount(*count));
            }
            Ok(())
        }
        Action::DiscardCard { team, card } => in_hand(state, *team, *card),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::state::{CardInstance, CardRef, Player, Stats};

    fn state() -> GameState {
        let mut state = GameState::empty(Board::court(9, 5), 0);
        for (id, team) in [(1, Team::Home), (2, Team::Home), (3, Team::Away)] {
            let player = Player::new(PlayerId(id), CardRef::from("p"), team, Stats::default());
            state.team_mut(team).roster.insert(PlayerId(id), player);
        }
        let deck = &mut state.team_mut(Team::Home).deck;
        deck.hand.push(CardInstance::new(InstanceId(10), "screen"));
        deck.discard.push(CardInstance::new(InstanceId(11), "screen"));
        state
    }

    #[test]
    fn passes_stay_within_a_team() {
        let state = state();
        assert_eq!(
            validate(
                &Action::Pass {
                    player: PlayerId(1),
                    receiver: PlayerId(3)
                },
                &state
            ),
            Err(SchemaError::WrongTeam {
                player: PlayerId(3),
                team: Team::Home
            })
        );
        assert_eq!(
            validate(
                &Action::Pass {
                    player: PlayerId(1),
                    receiver: PlayerId(1)
                },
                &state
            ),
            Err(SchemaError::SelfTarget(PlayerId(1)))
        );
        assert!(
            validate(
                &Action::Pass {
                    player: PlayerId(1),
                    receiver: PlayerId(2)
                },
                &state
            )
            .is_ok()
        );
    }

    #[test]
    fn cards_must_be_in_hand() {
        let state = state();
        let play = |card| Action::PlayCard {
            team: Team::Home,
            card: InstanceId(card),
            target: None,
        };
        assert!(validate(&play(10), &state).is_ok());
        assert_eq!(
            validate(&play(11), &state),
            Err(SchemaError::NotInHand {
                team: Team::Home,
                card: InstanceId(11),
                pile: Pile::Discard
            })
        );
        assert_eq!(
            validate(&play(12), &state),
            Err(SchemaError::UnknownCard {
                team: Team::Home,
                card: InstanceId(12)
            })
        );
    }

    #[test]
    fn moves_must_stay_on_court() {
        let state = state();
        let to = Position::new(40, 40);
        assert_eq!(
            validate(
                &Action::MovePlayer {
                    player: PlayerId(1),
                    to
                },
                &state
            ),
            Err(SchemaError::OffBoard(to))
        );
    }
}
