//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::CardRef;

/// Errors raised when the card catalog cannot answer a lookup.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("card '{0}' not found in catalog")]
    CardNotFound(CardRef),

    #[error("card '{slug}' is malformed: {reason}")]
    InvalidCard { slug: CardRef, reason: String },
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CardNotFound(_) => "ORACLE_CARD_NOT_FOUND",
            Self::InvalidCard { .. } => "ORACLE_INVALID_CARD",
        }
    }
}
