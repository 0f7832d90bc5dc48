//! Concrete actions a player could take right now.
//!
//! Candidates come from the board and roster; each one is kept only if the
//! registry's policy for it is satisfied, so UIs grey out exactly what the
//! engine would reject at the policy stage.

use super::registry::PolicyRegistry;
use crate::action::Action;
use crate::rules::zoc;
use crate::state::{GameState, PlayerId, Position};

/// Tiles `player` may move to this action.
pub fn legal_destinations(
    state: &GameState,
    policies: &PolicyRegistry,
    player: PlayerId,
) -> Vec<Position> {
    let Some(mover) = state.player(player) else {
        return Vec::new();
    };
    zoc::reachable(state, mover, zoc::movement_budget(mover))
        .into_keys()
        .filter(|to| policies.allows(state, &Action::MovePlayer { player, to: *to }))
        .collect()
}

/// Teammates `player` may pass to.
pub fn legal_pass_targets(
    state: &GameState,
    policies: &PolicyRegistry,
    player: PlayerId,
) -> Vec<PlayerId> {
    let Some(passer) = state.player(player) else {
        return Vec::new();
    };
    state
        .on_court(passer.team)
        .filter(|mate| mate.id != player)
        .map(|mate| mate.id)
        .filter(|receiver| {
            policies.allows(
                state,
                &Action::Pass {
                    player,
                    receiver: *receiver,
                },
            )
        })
        .collect()
}

/// Every player action `player` may take, moves first.
pub fn available_actions(
    state: &GameState,
    policies: &PolicyRegistry,
    player: PlayerId,
) -> Vec<Action> {
    let Some(actor) = state.player(player) else {
        return Vec::new();
    };

    let mut actions: Vec<Action> = legal_destinations(state, policies, player)
        .into_iter()
        .map(|to| Action::MovePlayer { player, to })
        .collect();
    actions.extend(
        legal_pass_targets(state, policies, player)
            .into_iter()
            .map(|receiver| Action::Pass { player, receiver }),
    );

    let singles = [Action::Shoot { player }, Action::PickUpBall { player }];
    actions.extend(
        singles
            .into_iter()
            .filter(|action| policies.allows(state, action)),
    );

    actions.extend(
        state
            .team(actor.team)
            .bench()
            .map(|bench| Action::Substitute {
                out: player,
                incoming: bench.id,
            })
            .filter(|action| policies.allows(state, action)),
    );
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionType;
    use crate::board::Board;
    use crate::state::{BallState, CardRef, Phase, Player, Stats, Team};

    fn game() -> GameState {
        let mut state = GameState::empty(Board::court(9, 5), 1);
        state.phase = Phase::Actions;
        let spots = [
            (1, Team::Home, Some((2, 2))),
            (2, Team::Home, Some((4, 1))),
            (3, Team::Home, None),
            (4, Team::Away, Some((7, 3))),
        ];
        for (id, team, spot) in spots {
            let mut player = Player::new(PlayerId(id), CardRef::from("p"), team, Stats::default());
            if let Some((col, row)) = spot {
                let at = Position::from_offset(col, row);
                player.position = Some(at);
                state.board.place(at, PlayerId(id)).unwrap();
            }
            state.team_mut(team).roster.insert(PlayerId(id), player);
        }
        state.ball = BallState::Possessed {
            holder: PlayerId(1),
        };
        state
    }

    #[test]
    fn ball_holder_can_pass_shoot_and_substitute() {
        let state = game();
        let policies = PolicyRegistry::standard();
        let actions = available_actions(&state, &policies, PlayerId(1));
        let types: Vec<ActionType> = actions.iter().map(Action::action_type).collect();

        assert!(types.contains(&ActionType::MovePlayer));
        assert!(actions.contains(&Action::Pass {
            player: PlayerId(1),
            receiver: PlayerId(2)
        }));
        assert!(actions.contains(&Action::Shoot {
            player: PlayerId(1)
        }));
        assert!(!types.contains(&ActionType::PickUpBall));
        assert!(actions.contains(&Action::Substitute {
            out: PlayerId(1),
            incoming: PlayerId(3)
        }));
    }

    #[test]
    fn exhausted_players_have_no_moves() {
        let mut state = game();
        state.player_mut(PlayerId(2)).unwrap().exhausted = true;
        let policies = PolicyRegistry::standard();
        assert!(legal_destinations(&state, &policies, PlayerId(2)).is_empty());
        assert!(legal_pass_targets(&state, &policies, PlayerId(1)) == vec![PlayerId(2)]);
    }

    #[test]
    fn destinations_match_reachability() {
        let state = game();
        let mover = state.player(PlayerId(1)).unwrap();
        let expected: Vec<Position> = zoc::reachable(&state, mover, zoc::movement_budget(mover))
            .into_keys()
            .collect();
        assert_eq!(
            legal_destinations(&state, &PolicyRegistry::standard(), PlayerId(1)),
            expected
        );
    }
}
