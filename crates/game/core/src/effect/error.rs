//! Per-effect failures.

use crate::board::{BoardError, Position};
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{CardRef, ChoiceId, InstanceId, InvariantViolation, PlayerId, Team};
use crate::trigger::EventKind;

/// Why a single effect could not be applied.
///
/// These are collected in [`super::EffectOutcome::failures`]; the failing
/// effect leaves no trace in the resulting state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("parameter '{name}' is not bound")]
    UnboundParameter { name: String },

    #[error("parameter '{name}' is bound to a {found}, expected a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0} is not on any roster")]
    UnknownPlayer(PlayerId),

    #[error("{0} is not on court")]
    PlayerOffCourt(PlayerId),

    #[error("{0} is already on court")]
    PlayerOnCourt(PlayerId),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("{card} is not in the {team} {pile}")]
    CardNotFound {
        team: Team,
        card: InstanceId,
        pile: &'static str,
    },

    #[error("{0} is not attached to a player nor in the play area")]
    CardNotInPlay(InstanceId),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("card '{0}' cannot be played")]
    NotPlayable(CardRef),

    #[error("card '{0}' needs a target player")]
    TargetRequired(CardRef),

    #[error("cannot draw {0} cards at once")]
    TooManyCards(i64),

    #[error("score change of {0} points is not allowed")]
    InvalidPoints(i64),

    #[error("resolution stack is empty")]
    EmptyStack,

    #[error("no request event is in flight")]
    NoEventInFlight,

    #[error("{0} can no longer be prevented once its default rule ran")]
    TooLateToPrevent(EventKind),

    #[error("payload field '{key}' of the event in flight is not an integer")]
    NotAnInteger { key: String },

    #[error("no skill test is open")]
    NoSkillTest,

    #[error("skill test {0} is still open")]
    SkillTestOpen(u32),

    #[error("{passer} cannot pass to {receiver}")]
    InvalidReceiver { passer: PlayerId, receiver: PlayerId },

    #[error("choice {choice} has no option {option}")]
    UnknownOption { choice: ChoiceId, option: i64 },

    #[error("choice '{0}' has no options")]
    EmptyChoice(String),

    #[error("ball is loose at {0}, nobody holds it")]
    BallNotHeld(Position),

    #[error("post-validation failed: {0}")]
    Invariant(InvariantViolation),
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        use EffectError::*;
        match self {
            UnboundParameter { .. } | TypeMismatch { .. } | NotAnInteger { .. } => {
                ErrorSeverity::Validation
            }
            UnknownPlayer(_)
            | CardNotFound { .. }
            | CardNotInPlay(_)
            | NotPlayable(_)
            | TargetRequired(_)
            | TooManyCards(_)
            | InvalidPoints(_)
            | InvalidReceiver { .. }
            | UnknownOption { .. }
            | EmptyChoice(_) => ErrorSeverity::Validation,
            Board(e) => e.severity(),
            Oracle(e) => e.severity(),
            PlayerOffCourt(_) | PlayerOnCourt(_) | BallNotHeld(_) => ErrorSeverity::Recoverable,
            EmptyStack
            | NoEventInFlight
            | TooLateToPrevent(_)
            | NoSkillTest
            | SkillTestOpen(_)
            | Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use EffectError::*;
        match self {
            UnboundParameter { .. } => "EFFECT_UNBOUND_PARAMETER",
            TypeMismatch { .. } => "EFFECT_TYPE_MISMATCH",
            UnknownPlayer(_) => "EFFECT_UNKNOWN_PLAYER",
            PlayerOffCourt(_) => "EFFECT_PLAYER_OFF_COURT",
            PlayerOnCourt(_) => "EFFECT_PLAYER_ON_COURT",
            Board(e) => e.error_code(),
            CardNotFound { .. } => "EFFECT_CARD_NOT_FOUND",
            CardNotInPlay(_) => "EFFECT_CARD_NOT_IN_PLAY",
            Oracle(e) => e.error_code(),
            NotPlayable(_) => "EFFECT_NOT_PLAYABLE",
            TargetRequired(_) => "EFFECT_TARGET_REQUIRED",
            TooManyCards(_) => "EFFECT_TOO_MANY_CARDS",
            InvalidPoints(_) => "EFFECT_INVALID_POINTS",
            EmptyStack => "EFFECT_EMPTY_STACK",
            NoEventInFlight => "EFFECT_NO_EVENT_IN_FLIGHT",
            TooLateToPrevent(_) => "EFFECT_TOO_LATE_TO_PREVENT",
            NotAnInteger { .. } => "EFFECT_NOT_AN_INTEGER",
            NoSkillTest => "EFFECT_NO_SKILL_TEST",
            SkillTestOpen(_) => "EFFECT_SKILL_TEST_OPEN",
            InvalidReceiver { .. } => "EFFECT_INVALID_RECEIVER",
            UnknownOption { .. } => "EFFECT_UNKNOWN_OPTION",
            EmptyChoice(_) => "EFFECT_EMPTY_CHOICE",
            BallNotHeld(_) => "EFFECT_BALL_NOT_HELD",
            Invariant(e) => e.error_code(),
        }
    }
}
