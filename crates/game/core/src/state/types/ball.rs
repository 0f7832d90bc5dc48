use super::common::PlayerId;
use crate::board::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum FlightKind {
    Shot,
    Pass,
}

/// Where the ball is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BallState {
    Possessed {
        holder: PlayerId,
    },
    Loose {
        position: Position,
    },
    InAir {
        origin: Position,
        target: Position,
        kind: FlightKind,
    },
}

impl BallState {
    pub fn holder(&self) -> Option<PlayerId> {
        match self {
            BallState::Possessed { holder } => Some(*holder),
            _ => None,
        }
    }

    pub fn loose_at(&self) -> Option<Position> {
        match self {
            BallState::Loose { position } => Some(*position),
            _ => None,
        }
    }

    pub fn is_in_air(&self) -> bool {
        matches!(self, BallState::InAir { .. })
    }
}
