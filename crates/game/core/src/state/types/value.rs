//! Typed binding values shared by effects, events and trigger documents.

use std::collections::BTreeMap;

use super::common::{ChoiceId, InstanceId, PlayerId, Team};
use crate::board::Position;

/// A single bound value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Player(PlayerId),
    Team(Team),
    Position(Position),
    Card(InstanceId),
    Choice(ChoiceId),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Short type name used in mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Player(_) => "player",
            Value::Team(_) => "team",
            Value::Position(_) => "position",
            Value::Card(_) => "card",
            Value::Choice(_) => "choice",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
        }
    }
}

impl From<PlayerId> for Value {
    fn from(v: PlayerId) -> Self {
        Value::Player(v)
    }
}

impl From<Team> for Value {
    fn from(v: Team) -> Self {
        Value::Team(v)
    }
}

impl From<Position> for Value {
    fn from(v: Position) -> Self {
        Value::Position(v)
    }
}

impl From<InstanceId> for Value {
    fn from(v: InstanceId) -> Self {
        Value::Card(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

/// Reserved binding names.
pub mod names {
    /// The player a trigger or card acts for.
    pub const SELF: &str = "self";
    /// The team that owns the running card or trigger.
    pub const OWNER: &str = "owner";
    pub const TARGET: &str = "target";
    /// Value of the option picked for the pending choice.
    pub const CHOICE_SELECTED: &str = "choice-selected";
    /// Instance id of the running card.
    pub const CARD: &str = "card";
    pub const EVENT_PLAYER: &str = "event-player";
    pub const EVENT_TEAM: &str = "event-team";
    /// Prefix under which the in-flight event payload is exposed to triggers.
    pub const EVENT_PREFIX: &str = "event.";
}

/// Named values visible to an effect while it runs.
///
/// Bindings only grow: a nested scope layers new names over its parent by
/// building a new value with [`Bindings::merged`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Bindings(BTreeMap<String, Value>);

/// Event payloads use the same typed map.
pub type Payload = Bindings;

impl Bindings {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `self` overlaid with `other`; names in `other` win.
    #[must_use]
    pub fn merged(&self, other: &Bindings) -> Bindings {
        let mut out = self.clone();
        for (name, value) in &other.0 {
            out.0.insert(name.clone(), value.clone());
        }
        out
    }

    pub fn player(&self, name: &str) -> Option<PlayerId> {
        match self.get(name)? {
            Value::Player(id) => Some(*id),
            _ => None,
        }
    }

    pub fn team(&self, name: &str) -> Option<Team> {
        match self.get(name)? {
            Value::Team(team) => Some(*team),
            _ => None,
        }
    }

    pub fn position(&self, name: &str) -> Option<Position> {
        match self.get(name)? {
            Value::Position(pos) => Some(*pos),
            _ => None,
        }
    }

    pub fn card(&self, name: &str) -> Option<InstanceId> {
        match self.get(name)? {
            Value::Card(id) => Some(*id),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_prefers_overlay() {
        let base = Bindings::new()
            .with(names::SELF, PlayerId(1))
            .with(names::OWNER, Team::Home);
        let overlay = Bindings::new().with(names::SELF, PlayerId(2));

        let merged = base.merged(&overlay);
        assert_eq!(merged.player(names::SELF), Some(PlayerId(2)));
        assert_eq!(merged.team(names::OWNER), Some(Team::Home));
        assert_eq!(base.player(names::SELF), Some(PlayerId(1)));
    }

    #[test]
    fn typed_getters_reject_wrong_type() {
        let b = Bindings::new().with("count", 3i64);
        assert_eq!(b.int("count"), Some(3));
        assert_eq!(b.player("count"), None);
        assert_eq!(b.int("missing"), None);
    }
}
