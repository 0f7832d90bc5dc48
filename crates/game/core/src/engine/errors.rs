//! Error types for the action pipeline.

use crate::action::{ActionType, SchemaError};
use crate::effect::EffectError;
use crate::error::{EngineFault, ErrorSeverity, GameError};
use crate::policy::{Explanation, Residual};
use crate::state::{ChoiceId, InvariantViolation, Tick};

/// Identifies which stage of the pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    Schema,
    Policy,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::Schema => "schema",
            TransitionPhase::Policy => "policy",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

fn summary(explanations: &[Explanation]) -> String {
    explanations
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A well-formed action the rules refuse. The state is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("{choice} must be resolved first")]
    ChoicePending { choice: ChoiceId },

    #[error("{action} is not allowed: {}", summary(.explanations))]
    Policy {
        action: ActionType,
        residual: Residual,
        explanations: Vec<Explanation>,
    },

    #[error("{effect} failed: {error}")]
    EffectFailed {
        effect: &'static str,
        error: EffectError,
    },

    #[error("state invariants broken: {0:?}")]
    Invariant(Vec<InvariantViolation>),
}

impl GameError for RuleViolation {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ChoicePending { .. } | Self::Policy { .. } => ErrorSeverity::Recoverable,
            Self::EffectFailed { error, .. } => error.severity(),
            Self::Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ChoicePending { .. } => "RULE_CHOICE_PENDING",
            Self::Policy { .. } => "RULE_POLICY",
            Self::EffectFailed { .. } => "RULE_EFFECT_FAILED",
            Self::Invariant(_) => "RULE_INVARIANT",
        }
    }
}

/// Errors surfaced while executing an action through the game engine.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("action rejected: {0}")]
    Rule(TransitionPhaseError<RuleViolation>),

    #[error("action aborted: {0}")]
    Fault(TransitionPhaseError<EngineFault>),
}

impl ExecuteError {
    pub(super) fn rule(phase: TransitionPhase, violation: RuleViolation) -> Self {
        Self::Rule(TransitionPhaseError::new(phase, violation))
    }

    pub(super) fn fault(phase: TransitionPhase, fault: EngineFault) -> Self {
        Self::Fault(TransitionPhaseError::new(phase, fault))
    }

    pub fn phase(&self) -> TransitionPhase {
        match self {
            Self::Schema(_) => TransitionPhase::Schema,
            Self::Rule(e) => e.phase,
            Self::Fault(e) => e.phase,
        }
    }

    pub fn violation(&self) -> Option<&RuleViolation> {
        match self {
            Self::Rule(e) => Some(&e.error),
            _ => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Schema(e) => e.severity(),
            Self::Rule(e) => e.error.severity(),
            Self::Fault(e) => e.error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Schema(e) => e.error_code(),
            Self::Rule(e) => e.error.error_code(),
            Self::Fault(e) => e.error.error_code(),
        }
    }
}

/// Errors raised while replaying a recorded history.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("event {index} is stamped {found} but the clock is at {expected}")]
    ClockMismatch {
        index: usize,
        expected: Tick,
        found: Tick,
    },

    #[error("event {index}: {effect} failed: {error}")]
    EffectFailed {
        index: usize,
        effect: &'static str,
        error: EffectError,
    },

    #[error("event {index} aborted: {fault}")]
    Fault { index: usize, fault: EngineFault },
}

impl GameError for ReplayError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ClockMismatch { .. } => "REPLAY_CLOCK_MISMATCH",
            Self::EffectFailed { .. } => "REPLAY_EFFECT_FAILED",
            Self::Fault { .. } => "REPLAY_FAULT",
        }
    }
}
