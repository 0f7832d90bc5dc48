use super::common::{ChoiceId, Team};
use super::value::{Bindings, Value};
use crate::effect::Effect;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceOption {
    pub id: u32,
    pub label: String,
    /// Bound as `choice-selected` when this option is picked.
    pub value: Value,
}

impl ChoiceOption {
    pub fn new(id: u32, label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id,
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Follow-up work parked until the choice is made.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Continuation {
    Single(Box<Effect>),
    Sequence(Vec<Effect>),
}

impl Continuation {
    pub fn effects(&self) -> Vec<&Effect> {
        match self {
            Continuation::Single(effect) => vec![effect.as_ref()],
            Continuation::Sequence(effects) => effects.iter().collect(),
        }
    }

    /// Appends effects that must run after the existing continuation.
    #[must_use]
    pub fn then(self, rest: Vec<Effect>) -> Continuation {
        let mut effects = match self {
            Continuation::Single(effect) => vec![*effect],
            Continuation::Sequence(effects) => effects,
        };
        effects.extend(rest);
        Continuation::Sequence(effects)
    }
}

/// A decision parked in state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingChoice {
    pub id: ChoiceId,
    /// Free-form type tag, e.g. `"pick-teammate"`.
    pub kind: String,
    pub options: Vec<ChoiceOption>,
    /// The team that must decide.
    pub team: Team,
    pub selected: Option<u32>,
    pub continuation: Option<Continuation>,
    /// Bindings in scope when the choice was offered.
    pub bindings: Bindings,
}

impl PendingChoice {
    pub fn option(&self, id: u32) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn selected_option(&self) -> Option<&ChoiceOption> {
        self.selected.and_then(|id| self.option(id))
    }
}
