//! Authoritative game state representation.
//!
//! [`GameState`] is the single root value. Callers only ever see whole
//! snapshots: the engine clones it into a working copy, mutates that copy and
//! publishes it on success.
mod event;
pub mod invariants;
mod setup;
pub mod types;

pub use crate::board::Position;
pub use event::Event;
pub use invariants::InvariantViolation;
pub use setup::{InitialLayout, PlayerSetup, SetupError};
pub use types::*;

use crate::board::Board;

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Seed for deterministic shuffling; set once at creation.
    pub game_seed: u64,
    pub phase: Phase,
    pub turn: u32,
    pub quarter: u8,
    pub active_team: Team,
    pub score: Score,
    pub board: Board,
    pub ball: BallState,
    pub teams: Teams,
    pub play_area: Vec<PlayedCard>,
    pub stack: Vec<StackEntry>,
    /// Append-only history; written by the engine only.
    pub events: Vec<Event>,
    pub pending_choice: Option<PendingChoice>,
    pub pending_skill_test: Option<PendingSkillTest>,
    /// Logical clock; the timestamp of the next event.
    pub clock: Tick,
    /// Shuffles performed so far; feeds the shuffle seed.
    pub shuffles: u32,
    next_instance_id: u32,
    next_test_id: u32,
}

impl GameState {
    /// Empty state on the given board, before any roster is added.
    pub fn empty(board: Board, game_seed: u64) -> Self {
        let center = Position::from_offset(board.width() / 2, board.height() / 2);
        Self {
            game_seed,
            phase: Phase::Setup,
            turn: 1,
            quarter: 1,
            active_team: Team::Home,
            score: Score::default(),
            board,
            ball: BallState::Loose { position: center },
            teams: Teams::new(),
            play_area: Vec::new(),
            stack: Vec::new(),
            events: Vec::new(),
            pending_choice: None,
            pending_skill_test: None,
            clock: Tick::ZERO,
            shuffles: 0,
            next_instance_id: 1,
            next_test_id: 1,
        }
    }

    // ===== id allocation =====

    pub fn allocate_instance_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance_id);
        self.next_instance_id += 1;
        id
    }

    /// Id for a choice offered by the action at the current clock.
    ///
    /// At most one choice is pending at a time and the clock advances with
    /// every action, so no counter is kept in state.
    pub fn choice_id(&self) -> ChoiceId {
        ChoiceId(self.clock.0)
    }

    pub fn allocate_test_id(&mut self) -> u32 {
        let id = self.next_test_id;
        self.next_test_id += 1;
        id
    }

    // ===== queries =====

    pub fn team(&self, team: Team) -> &TeamState {
        self.teams.get(team)
    }

    pub fn team_mut(&mut self, team: Team) -> &mut TeamState {
        self.teams.get_mut(team)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.teams.iter().find_map(|t| t.roster.get(&id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        if self.teams.home.roster.contains_key(&id) {
            self.teams.home.roster.get_mut(&id)
        } else {
            self.teams.away.roster.get_mut(&id)
        }
    }

    /// All rostered players, Home first, in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.teams.iter().flat_map(|t| t.roster.values())
    }

    pub fn on_court(&self, team: Team) -> impl Iterator<Item = &Player> {
        self.team(team).on_court()
    }

    pub fn player_at(&self, position: Position) -> Option<&Player> {
        self.board
            .occupant(position)
            .and_then(|id| self.player(id))
    }

    pub fn ball_holder(&self) -> Option<&Player> {
        self.ball.holder().and_then(|id| self.player(id))
    }

    /// The team and pile currently holding a card instance.
    pub fn locate_card(&self, id: InstanceId) -> Option<(Team, Pile)> {
        Team::ALL
            .into_iter()
            .find_map(|team| self.team(team).deck.locate(id).map(|pile| (team, pile)))
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// The state with its history stripped, for comparisons that ignore the
    /// log. The log itself is never cloned.
    pub fn without_events(&self) -> GameState {
        GameState {
            game_seed: self.game_seed,
            phase: self.phase,
            turn: self.turn,
            quarter: self.quarter,
            active_team: self.active_team,
            score: self.score,
            board: self.board.clone(),
            ball: self.ball,
            teams: self.teams.clone(),
            play_area: self.play_area.clone(),
            stack: self.stack.clone(),
            events: Vec::new(),
            pending_choice: self.pending_choice.clone(),
            pending_skill_test: self.pending_skill_test.clone(),
            clock: self.clock,
            shuffles: self.shuffles,
            next_instance_id: self.next_instance_id,
            next_test_id: self.next_test_id,
        }
    }
}
