//! Parameter resolution against bindings.

use super::{EffectError, Param};
use crate::board::Position;
use crate::state::{Bindings, ChoiceId, InstanceId, PlayerId, Team, Value};

/// Types a binding value can be read back as.
pub trait FromValue: Sized {
    /// Type name reported on mismatch.
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for PlayerId {
    const KIND: &'static str = "player";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Player(id) => Some(*id),
            _ => None,
        }
    }
}

impl FromValue for Team {
    const KIND: &'static str = "team";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Team(team) => Some(*team),
            _ => None,
        }
    }
}

impl FromValue for Position {
    const KIND: &'static str = "position";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Position(pos) => Some(*pos),
            _ => None,
        }
    }
}

impl FromValue for InstanceId {
    const KIND: &'static str = "card";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Card(id) => Some(*id),
            _ => None,
        }
    }
}

impl FromValue for ChoiceId {
    const KIND: &'static str = "choice";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Choice(id) => Some(*id),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const KIND: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const KIND: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for Value {
    const KIND: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromValue + Clone> Param<T> {
    /// Resolves the parameter against `bindings`.
    ///
    /// # Errors
    ///
    /// `UnboundParameter` if the name is not bound, `TypeMismatch` if it is
    /// bound to a value of another type.
    pub fn resolve(&self, bindings: &Bindings) -> Result<T, EffectError> {
        match self {
            Param::Value(value) => Ok(value.clone()),
            Param::Bound(name) => {
                let value = bindings
                    .get(name)
                    .ok_or_else(|| EffectError::UnboundParameter { name: name.clone() })?;
                T::from_value(value).ok_or_else(|| EffectError::TypeMismatch {
                    name: name.clone(),
                    expected: T::KIND,
                    found: value.type_name(),
                })
            }
        }
    }
}
