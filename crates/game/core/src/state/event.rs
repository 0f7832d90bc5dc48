use super::types::{Payload, Tick};
use crate::action::Action;

/// One entry of the append-only history.
///
/// `action` is the original action payload; `data` carries whatever the
/// engine attached while applying it (prevention, pending choice, an
/// abandoned continuation).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub action: Action,
    pub timestamp: Tick,
    pub data: Payload,
}

impl Event {
    pub const PREVENTED: &'static str = "prevented";
    pub const PENDING_CHOICE: &'static str = "pending-choice";
    pub const CONTINUATION_FAILED: &'static str = "continuation-failed";

    pub fn new(action: Action, timestamp: Tick) -> Self {
        Self {
            action,
            timestamp,
            data: Payload::new(),
        }
    }

    pub fn was_prevented(&self) -> bool {
        self.data.flag(Self::PREVENTED).unwrap_or(false)
    }

    pub fn continuation_failed(&self) -> bool {
        self.data.flag(Self::CONTINUATION_FAILED).unwrap_or(false)
    }
}
