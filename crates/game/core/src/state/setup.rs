//! Fixed initial layout and state creation.

use super::{CardInstance, CardRef, Deck, GameState, Player, PlayerId, Size, Stats, Team};
use crate::board::{Board, BoardError, Position};
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

/// One rostered player in the initial layout.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSetup {
    pub card: CardRef,
    pub stats: Stats,
    /// Starting tile in axial coordinates; `None` starts on the bench.
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: Option<Position>,
}

impl PlayerSetup {
    pub fn new(card: impl Into<CardRef>, stats: Stats, start: Option<Position>) -> Self {
        Self {
            card: card.into(),
            stats,
            start,
        }
    }
}

/// Rosters and decks both teams start with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialLayout {
    pub home: Vec<PlayerSetup>,
    pub away: Vec<PlayerSetup>,
    /// Draw piles, bottom first.
    pub home_deck: Vec<CardRef>,
    pub away_deck: Vec<CardRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("{0} has no player on court")]
    NoStarters(Team),

    #[error("cannot place starter: {0}")]
    Board(#[from] BoardError),
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoStarters(_) => "SETUP_NO_STARTERS",
            Self::Board(_) => "SETUP_BOARD",
        }
    }
}

impl InitialLayout {
    /// Three starters and one substitute per team on the default 13x7 court.
    pub fn standard(home_deck: Vec<CardRef>, away_deck: Vec<CardRef>) -> Self {
        let roster = |prefix: &str, cols: [i32; 3]| {
            let stats = [
                Stats {
                    size: Size::Small,
                    speed: 5,
                    shooting: 4,
                    passing: 5,
                    dribbling: 5,
                    defense: 2,
                },
                Stats {
                    size: Size::Medium,
                    speed: 4,
                    shooting: 5,
                    passing: 3,
                    dribbling: 3,
                    defense: 3,
                },
                Stats {
                    size: Size::Large,
                    speed: 3,
                    shooting: 3,
                    passing: 2,
                    dribbling: 2,
                    defense: 5,
                },
            ];
            let rows = [1, 3, 5];
            let mut players: Vec<PlayerSetup> = stats
                .into_iter()
                .zip(cols.into_iter().zip(rows))
                .enumerate()
                .map(|(i, (stats, (col, row)))| {
                    PlayerSetup::new(
                        CardRef::new(format!("{prefix}-starter-{}", i + 1)),
                        stats,
                        Some(Position::from_offset(col, row)),
                    )
                })
                .collect();
            players.push(PlayerSetup::new(
                CardRef::new(format!("{prefix}-sixth-man")),
                Stats::default(),
                None,
            ));
            players
        };

        Self {
            home: roster("home", [4, 5, 4]),
            away: roster("away", [8, 7, 8]),
            home_deck,
            away_deck,
        }
    }
}

impl GameState {
    /// Creates the state a game starts from.
    ///
    /// Player ids are assigned in layout order, Home first; card instance ids
    /// likewise. The game is left in [`super::Phase::Setup`] until a
    /// `StartGame` action tips off.
    pub fn initial(
        layout: &InitialLayout,
        config: &GameConfig,
        game_seed: u64,
    ) -> Result<GameState, SetupError> {
        let board = Board::court(config.court_width, config.court_height);
        let mut state = GameState::empty(board, game_seed);
        let mut next_player = 1u32;

        for (team, setups, deck) in [
            (Team::Home, &layout.home, &layout.home_deck),
            (Team::Away, &layout.away, &layout.away_deck),
        ] {
            if !setups.iter().any(|s| s.start.is_some()) {
                return Err(SetupError::NoStarters(team));
            }

            for setup in setups {
                let id = PlayerId(next_player);
                next_player += 1;
                let mut player = Player::new(id, setup.card.clone(), team, setup.stats);
                if let Some(start) = setup.start {
                    state.board.place(start, id)?;
                    player.position = Some(start);
                }
                state.team_mut(team).roster.insert(id, player);
            }

            let draw = deck
                .iter()
                .map(|card| CardInstance::new(state.allocate_instance_id(), card.clone()))
                .collect();
            state.team_mut(team).deck = Deck::with_draw_pile(draw);
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::invariants;

    fn deck(n: usize) -> Vec<CardRef> {
        (0..n).map(|i| CardRef::new(format!("fate-{}", i % 6 + 1))).collect()
    }

    #[test]
    fn standard_layout_builds_a_sound_state() {
        let layout = InitialLayout::standard(deck(12), deck(12));
        let state = GameState::initial(&layout, &GameConfig::default(), 42).unwrap();

        assert_eq!(state.players().count(), 8);
        assert_eq!(state.on_court(Team::Home).count(), 3);
        assert_eq!(state.on_court(Team::Away).count(), 3);
        assert_eq!(state.team(Team::Home).deck.draw.len(), 12);
        assert!(invariants::check(&state).is_empty());
    }

    #[test]
    fn instance_ids_are_unique_across_teams() {
        let layout = InitialLayout::standard(deck(6), deck(6));
        let state = GameState::initial(&layout, &GameConfig::default(), 1).unwrap();
        let home: Vec<_> = state.team(Team::Home).deck.draw.iter().map(|c| c.id).collect();
        let away: Vec<_> = state.team(Team::Away).deck.draw.iter().map(|c| c.id).collect();
        assert!(home.iter().all(|id| !away.contains(id)));
    }

    #[test]
    fn layout_without_starters_is_rejected() {
        let mut layout = InitialLayout::standard(deck(3), deck(3));
        for p in &mut layout.away {
            p.start = None;
        }
        let err = GameState::initial(&layout, &GameConfig::default(), 1).unwrap_err();
        assert_eq!(err, SetupError::NoStarters(Team::Away));
    }
}
