use std::collections::BTreeMap;

use super::document::{FactKey, PolicyDocument};
use super::expr::{Evaluation, Expr, evaluate};
use crate::action::{Action, ActionType};
use crate::state::GameState;

/// Policies keyed by the action type they govern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyRegistry {
    policies: BTreeMap<ActionType, Expr>,
}

/// Requirements every in-turn action shares.
fn in_turn() -> Vec<Expr> {
    vec![
        Expr::is(FactKey::Started, true),
        Expr::is(FactKey::ActionPhase, true),
        Expr::is(FactKey::ActiveTeam, true),
    ]
}

/// [`in_turn`] plus an on-court, unexhausted actor.
fn ready_player(extra: impl IntoIterator<Item = Expr>) -> Expr {
    let mut all = in_turn();
    all.push(Expr::is(FactKey::OnCourt, true));
    all.push(Expr::is(FactKey::Exhausted, false));
    all.extend(extra);
    Expr::All(all)
}

fn in_turn_with(extra: impl IntoIterator<Item = Expr>) -> Expr {
    let mut all = in_turn();
    all.extend(extra);
    Expr::All(all)
}

impl PolicyRegistry {
    /// Registry with no policies; every action is allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules of a standard game.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(
            ActionType::StartGame,
            Expr::is(FactKey::Started, false),
        );
        registry.register(
            ActionType::MovePlayer,
            ready_player([Expr::is(FactKey::Reachable, true)]),
        );
        registry.register(
            ActionType::Pass,
            ready_player([
                Expr::is(FactKey::HoldsBall, true),
                Expr::is(FactKey::ReceiverOnCourt, true),
            ]),
        );
        registry.register(
            ActionType::Shoot,
            ready_player([Expr::is(FactKey::HoldsBall, true)]),
        );
        registry.register(
            ActionType::PickUpBall,
            ready_player([
                Expr::is(FactKey::BallLoose, true),
                Expr::at_most(FactKey::BallDistance, 1),
            ]),
        );
        registry.register(
            ActionType::PlayCard,
            in_turn_with([
                Expr::is(FactKey::CardInHand, true),
                Expr::is(FactKey::TargetOnCourt, true),
            ]),
        );
        registry.register(
            ActionType::Substitute,
            in_turn_with([
                Expr::is(FactKey::OutgoingOnCourt, true),
                Expr::is(FactKey::OnCourt, false),
            ]),
        );
        registry.register(ActionType::DrawCards, in_turn_with([]));
        registry.register(
            ActionType::DiscardCard,
            in_turn_with([Expr::is(FactKey::CardInHand, true)]),
        );
        registry.register(
            ActionType::EndTurn,
            Expr::all([
                Expr::is(FactKey::Started, true),
                Expr::is(FactKey::ActionPhase, true),
            ]),
        );
        registry
    }

    /// Sets the policy for `action_type`, returning the one it replaces.
    pub fn register(&mut self, action_type: ActionType, policy: Expr) -> Option<Expr> {
        self.policies.insert(action_type, policy)
    }

    pub fn remove(&mut self, action_type: ActionType) -> Option<Expr> {
        self.policies.remove(&action_type)
    }

    pub fn get(&self, action_type: ActionType) -> Option<&Expr> {
        self.policies.get(&action_type)
    }

    /// Evaluates the policy for `action` in `state`; no policy is satisfied.
    pub fn evaluate(&self, state: &GameState, action: &Action) -> Evaluation {
        match self.get(action.action_type()) {
            Some(policy) => evaluate(policy, &PolicyDocument::for_action(state, action)),
            None => Evaluation::Satisfied,
        }
    }

    pub fn allows(&self, state: &GameState, action: &Action) -> bool {
        self.evaluate(state, action).is_satisfied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::state::{CardRef, Phase, Player, PlayerId, Position, Stats, Team};

    fn started() -> GameState {
        let mut state = GameState::empty(Board::court(9, 5), 1);
        state.phase = Phase::Actions;
        for (id, team, col) in [(1, Team::Home, 2), (2, Team::Away, 6)] {
            let at = Position::from_offset(col, 2);
            let mut player = Player::new(
                PlayerId(id),
                CardRef::from("p"),
                team,
                Stats {
                    speed: 3,
                    ..Stats::default()
                },
            );
            player.position = Some(at);
            state.board.place(at, PlayerId(id)).unwrap();
            state.team_mut(team).roster.insert(PlayerId(id), player);
        }
        state
    }

    #[test]
    fn missing_policy_is_satisfied() {
        let registry = PolicyRegistry::new();
        assert!(registry.allows(&GameState::empty(Board::court(9, 5), 1), &Action::EndTurn));
    }

    #[test]
    fn exhausted_players_cannot_move() {
        let mut state = started();
        let action = Action::MovePlayer {
            player: PlayerId(1),
            to: Position::from_offset(3, 2),
        };
        let registry = PolicyRegistry::standard();
        assert!(registry.allows(&state, &action));

        state.player_mut(PlayerId(1)).unwrap().exhausted = true;
        let evaluation = registry.evaluate(&state, &action);
        let residual = evaluation.residual().unwrap();
        assert_eq!(residual.conflicts.len(), 1);
        assert_eq!(residual.conflicts[0].key, FactKey::Exhausted);
    }

    #[test]
    fn only_the_active_team_may_act() {
        let state = started();
        let action = Action::MovePlayer {
            player: PlayerId(2),
            to: Position::from_offset(7, 2),
        };
        let evaluation = PolicyRegistry::standard().evaluate(&state, &action);
        assert!(
            evaluation
                .residual()
                .unwrap()
                .conflicts
                .iter()
                .any(|c| c.key == FactKey::ActiveTeam)
        );
    }

    #[test]
    fn start_game_only_once() {
        let registry = PolicyRegistry::standard();
        let start = Action::StartGame {
            possession: Team::Home,
        };
        assert!(registry.allows(&GameState::empty(Board::court(9, 5), 1), &start));
        assert!(!registry.allows(&started(), &start));
    }
}
