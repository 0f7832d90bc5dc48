//! Common error infrastructure for hexball-core.
//!
//! Domain-specific errors (`SchemaError`, `EffectError`, `BoardError`, ...)
//! live beside the code that produces them. This module holds the shared
//! severity classification, the [`GameError`] trait they all implement and the
//! engine faults that abort a whole root action.

use crate::state::ChoiceId;
use crate::trigger::EventKind;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may retry with a different action
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: the current root action cannot complete
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: destination out of reach, target out of range.
    Recoverable,

    /// Examples: unknown player, card not in hand.
    Validation,

    /// Examples: occupancy map desync, duplicate card instance.
    Internal,

    /// Examples: trigger recursion limit, continuation without pending choice.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or an aborted action.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all hexball-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Failures that abort the whole root action.
///
/// Unlike [`crate::effect::EffectError`], which is collected per effect, a
/// fault unwinds the executor immediately. The caller's state is never
/// touched because the executor only publishes its working copy on success.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineFault {
    #[error("trigger recursion limit reached at depth {depth} while firing {event}")]
    RecursionLimit { depth: usize, event: EventKind },

    #[error("no pending choice to resolve")]
    NoPendingChoice,

    #[error("choice {existing} is already pending")]
    ChoiceAlreadyPending { existing: ChoiceId },

    #[error("choice {requested} does not match pending choice {pending}")]
    ChoiceMismatch {
        requested: ChoiceId,
        pending: ChoiceId,
    },
}

impl GameError for EngineFault {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RecursionLimit { .. } => "ENGINE_RECURSION_LIMIT",
            Self::NoPendingChoice => "ENGINE_NO_PENDING_CHOICE",
            Self::ChoiceAlreadyPending { .. } => "ENGINE_CHOICE_ALREADY_PENDING",
            Self::ChoiceMismatch { .. } => "ENGINE_CHOICE_MISMATCH",
        }
    }
}
