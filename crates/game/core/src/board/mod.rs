//! Hex court geometry and occupancy.
//!
//! The [`Board`] owns the static terrain of the court and the occupant map
//! keyed by position. It knows nothing about rules; ZoC and movement costs are
//! computed in [`crate::rules::zoc`] on top of it.
mod hex;

use std::collections::BTreeMap;

pub use hex::Position;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{PlayerId, Team};

/// Terrain of a single court tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    Court,
    /// Tiles adjacent to a hoop.
    Paint,
    /// The hoop itself; never standable.
    Hoop,
}

/// Errors raised by occupancy updates.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardError {
    #[error("position {0} is not on the court")]
    OffBoard(Position),

    #[error("position {0} cannot be stood on")]
    NotStandable(Position),

    #[error("position {position} is occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: PlayerId,
    },

    #[error("{player} does not occupy {position}")]
    NotAt { player: PlayerId, position: Position },
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OffBoard(_) | Self::NotStandable(_) => ErrorSeverity::Validation,
            Self::Occupied { .. } => ErrorSeverity::Recoverable,
            Self::NotAt { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OffBoard(_) => "BOARD_OFF_BOARD",
            Self::NotStandable(_) => "BOARD_NOT_STANDABLE",
            Self::Occupied { .. } => "BOARD_OCCUPIED",
            Self::NotAt { .. } => "BOARD_NOT_AT",
        }
    }
}

/// Court terrain plus the occupant map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: i32,
    height: i32,
    tiles: BTreeMap<Position, Terrain>,
    occupants: BTreeMap<Position, PlayerId>,
}

impl Board {
    /// Builds a rectangular court of `width` columns by `height` rows.
    ///
    /// Hoops sit at both ends of the middle row; Home shoots at the east hoop
    /// and Away at the west one.
    pub fn court(width: i32, height: i32) -> Self {
        let width = width.max(3);
        let height = height.max(1);
        let mid = height / 2;
        let west = Position::from_offset(0, mid);
        let east = Position::from_offset(width - 1, mid);

        let mut tiles = BTreeMap::new();
        for row in 0..height {
            for col in 0..width {
                let pos = Position::from_offset(col, row);
                let terrain = if pos == west || pos == east {
                    Terrain::Hoop
                } else if pos.is_adjacent(west) || pos.is_adjacent(east) {
                    Terrain::Paint
                } else {
                    Terrain::Court
                };
                tiles.insert(pos, terrain);
            }
        }

        Self {
            width,
            height,
            tiles,
            occupants: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        self.tiles.contains_key(&position)
    }

    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        self.tiles.get(&position).copied()
    }

    /// True if a player may stand on the tile (on the court, not a hoop).
    pub fn is_standable(&self, position: Position) -> bool {
        matches!(
            self.terrain(position),
            Some(Terrain::Court | Terrain::Paint)
        )
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Position, Terrain)> + '_ {
        self.tiles.iter().map(|(pos, terrain)| (*pos, *terrain))
    }

    /// Neighbouring tiles that exist on the court.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        position
            .neighbors()
            .into_iter()
            .filter(move |n| self.contains(*n))
    }

    /// The hoop `team` shoots at.
    pub fn scoring_hoop(&self, team: Team) -> Position {
        let mid = self.height / 2;
        match team {
            Team::Home => Position::from_offset(self.width - 1, mid),
            Team::Away => Position::from_offset(0, mid),
        }
    }

    /// First standable neighbour of `hoop`, preferring an empty tile.
    ///
    /// Missed shots and inbounds drop the ball here.
    pub fn rebound_tile(&self, hoop: Position) -> Option<Position> {
        let standable: Vec<Position> = self
            .neighbors(hoop)
            .filter(|n| self.is_standable(*n))
            .collect();
        standable
            .iter()
            .find(|n| !self.is_occupied(**n))
            .or(standable.first())
            .copied()
    }

    // ===== occupancy =====

    pub fn occupant(&self, position: Position) -> Option<PlayerId> {
        self.occupants.get(&position).copied()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupants.contains_key(&position)
    }

    pub fn occupants(&self) -> impl Iterator<Item = (Position, PlayerId)> + '_ {
        self.occupants.iter().map(|(pos, id)| (*pos, *id))
    }

    /// Checks that `player` could be placed at `position` without mutating.
    pub fn check_place(&self, position: Position, player: PlayerId) -> Result<(), BoardError> {
        if !self.contains(position) {
            return Err(BoardError::OffBoard(position));
        }
        if !self.is_standable(position) {
            return Err(BoardError::NotStandable(position));
        }
        match self.occupant(position) {
            Some(occupant) if occupant != player => Err(BoardError::Occupied {
                position,
                occupant,
            }),
            _ => Ok(()),
        }
    }

    pub fn place(&mut self, position: Position, player: PlayerId) -> Result<(), BoardError> {
        self.check_place(position, player)?;
        self.occupants.insert(position, player);
        Ok(())
    }

    /// Removes whoever stands on `position`.
    pub fn vacate(&mut self, position: Position) -> Option<PlayerId> {
        self.occupants.remove(&position)
    }

    /// Moves `player` from `from` to `to`.
    ///
    /// The old tile is vacated before the new one is claimed; the move is
    /// rejected without any change if either end does not check out.
    pub fn relocate(
        &mut self,
        player: PlayerId,
        from: Position,
        to: Position,
    ) -> Result<(), BoardError> {
        if self.occupant(from) != Some(player) {
            return Err(BoardError::NotAt {
                player,
                position: from,
            });
        }
        self.check_place(to, player)?;
        self.occupants.remove(&from);
        self.occupants.insert(to, player);
        Ok(())
    }
}
