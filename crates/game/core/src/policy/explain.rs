//! Human-readable reasons for policy conflicts.

use super::document::{FactKey, FactValue};
use super::expr::{Conflict, Residual};
use crate::action::ActionType;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Explanation {
    pub key: FactKey,
    pub message: String,
}

impl core::fmt::Display for Explanation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Messages that depend on which action raised the conflict.
fn override_message(action_type: ActionType, conflict: &Conflict) -> Option<&'static str> {
    match (action_type, conflict.key) {
        (ActionType::Substitute, FactKey::OnCourt) => Some("Incoming player is already on court"),
        (ActionType::StartGame, FactKey::Started) => Some("The game has already started"),
        (ActionType::PickUpBall, FactKey::BallLoose) => Some("Nobody can pick up a ball in play"),
        _ => None,
    }
}

fn default_message(conflict: &Conflict) -> String {
    match conflict.key {
        FactKey::Started => "The game has not started".to_owned(),
        FactKey::ActionPhase => "Actions are only allowed in the action phase".to_owned(),
        FactKey::ActiveTeam => "It is not this team's turn".to_owned(),
        FactKey::OnCourt => "Player is not on court".to_owned(),
        FactKey::OutgoingOnCourt => "Player being substituted is not on court".to_owned(),
        FactKey::Exhausted => "Player is exhausted and cannot act".to_owned(),
        FactKey::HoldsBall => "Player does not have the ball".to_owned(),
        FactKey::BallLoose => "The ball is not loose".to_owned(),
        FactKey::BallDistance => match conflict.witness {
            FactValue::Int(distance) => format!("The ball is {distance} hexes away"),
            FactValue::Bool(_) => "The ball is out of reach".to_owned(),
        },
        FactKey::Reachable => "Destination is out of movement range".to_owned(),
        FactKey::ReceiverOnCourt => "Receiver is not on court".to_owned(),
        FactKey::CardInHand => "Card is not in hand".to_owned(),
        FactKey::TargetOnCourt => "Target is not on court".to_owned(),
    }
}

/// Explains one conflict raised while validating `action_type`.
pub fn explain(action_type: ActionType, conflict: &Conflict) -> Explanation {
    let message = match override_message(action_type, conflict) {
        Some(message) => message.to_owned(),
        None => default_message(conflict),
    };
    Explanation {
        key: conflict.key,
        message,
    }
}

impl Residual {
    /// One explanation per conflict, then one per open fact.
    pub fn explain(&self, action_type: ActionType) -> Vec<Explanation> {
        let conflicts = self.conflicts.iter().map(|c| explain(action_type, c));
        let open = self.open.iter().map(|key| Explanation {
            key: *key,
            message: format!("Could not establish {key}"),
        });
        conflicts.chain(open).collect()
    }
}
