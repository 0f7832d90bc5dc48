//! Policy expressions and their partial evaluation.

use super::document::{FactKey, FactValue, PolicyDocument};

/// A single requirement on one fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    Is(FactKey, bool),
    AtLeast(FactKey, i64),
    AtMost(FactKey, i64),
}

impl Constraint {
    pub fn key(&self) -> FactKey {
        match self {
            Constraint::Is(key, _) | Constraint::AtLeast(key, _) | Constraint::AtMost(key, _) => {
                *key
            }
        }
    }

    /// Whether `value` meets the constraint; a value of the wrong type never does.
    pub fn holds(&self, value: FactValue) -> bool {
        match (self, value) {
            (Constraint::Is(_, want), FactValue::Bool(have)) => *want == have,
            (Constraint::AtLeast(_, min), FactValue::Int(have)) => have >= *min,
            (Constraint::AtMost(_, max), FactValue::Int(have)) => have <= *max,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Check(Constraint),
    All(Vec<Expr>),
    Any(Vec<Expr>),
}

impl Expr {
    pub fn is(key: FactKey, value: bool) -> Self {
        Expr::Check(Constraint::Is(key, value))
    }

    pub fn at_least(key: FactKey, min: i64) -> Self {
        Expr::Check(Constraint::AtLeast(key, min))
    }

    pub fn at_most(key: FactKey, max: i64) -> Self {
        Expr::Check(Constraint::AtMost(key, max))
    }

    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::All(exprs.into_iter().collect())
    }

    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Any(exprs.into_iter().collect())
    }
}

/// A constraint contradicted by a known fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conflict {
    pub key: FactKey,
    /// The value that broke the constraint.
    pub witness: FactValue,
    pub constraint: Constraint,
}

/// What is left of a policy that the document did not satisfy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Residual {
    pub conflicts: Vec<Conflict>,
    /// Facts the policy needed but the document does not carry.
    pub open: Vec<FactKey>,
}

impl Residual {
    fn merge(&mut self, other: Residual) {
        self.conflicts.extend(other.conflicts);
        for key in other.open {
            if !self.open.contains(&key) {
                self.open.push(key);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Evaluation {
    Satisfied,
    Residual(Residual),
}

impl Evaluation {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Evaluation::Satisfied)
    }

    pub fn residual(&self) -> Option<&Residual> {
        match self {
            Evaluation::Satisfied => None,
            Evaluation::Residual(residual) => Some(residual),
        }
    }
}

/// Evaluates `expr` against `doc`.
///
/// `All` is satisfied when every child is and otherwise reports every
/// child's residual. `Any` is satisfied when one child is and otherwise
/// reports all of them.
pub fn evaluate(expr: &Expr, doc: &PolicyDocument) -> Evaluation {
    match expr {
        Expr::Check(constraint) => {
            let key = constraint.key();
            match doc.get(key) {
                Some(value) if constraint.holds(value) => Evaluation::Satisfied,
                Some(witness) => Evaluation::Residual(Residual {
                    conflicts: vec![Conflict {
                        key,
                        witness,
                        constraint: *constraint,
                    }],
                    open: Vec::new(),
                }),
                None => Evaluation::Residual(Residual {
                    conflicts: Vec::new(),
                    open: vec![key],
                }),
            }
        }
        Expr::All(children) => {
            let mut residual = Residual::default();
            let mut satisfied = true;
            for child in children {
                if let Evaluation::Residual(r) = evaluate(child, doc) {
                    satisfied = false;
                    residual.merge(r);
                }
            }
            if satisfied {
                Evaluation::Satisfied
            } else {
                Evaluation::Residual(residual)
            }
        }
        Expr::Any(children) => {
            let mut residual = Residual::default();
            for child in children {
                match evaluate(child, doc) {
                    Evaluation::Satisfied => return Evaluation::Satisfied,
                    Evaluation::Residual(r) => residual.merge(r),
                }
            }
            Evaluation::Residual(residual)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_collects_conflicts_and_open_facts() {
        let policy = Expr::all([
            Expr::is(FactKey::OnCourt, true),
            Expr::is(FactKey::Exhausted, false),
            Expr::is(FactKey::HoldsBall, true),
        ]);
        let doc = PolicyDocument::new()
            .with(FactKey::OnCourt, true)
            .with(FactKey::Exhausted, true);

        let Evaluation::Residual(residual) = evaluate(&policy, &doc) else {
            panic!("expected a residual");
        };
        assert_eq!(residual.conflicts.len(), 1);
        assert_eq!(residual.conflicts[0].key, FactKey::Exhausted);
        assert_eq!(residual.conflicts[0].witness, FactValue::Bool(true));
        assert_eq!(residual.open, vec![FactKey::HoldsBall]);
    }

    #[test]
    fn any_needs_one_branch() {
        let policy = Expr::any([
            Expr::is(FactKey::HoldsBall, true),
            Expr::at_most(FactKey::BallDistance, 1),
        ]);
        let near = PolicyDocument::new()
            .with(FactKey::HoldsBall, false)
            .with(FactKey::BallDistance, 1i64);
        let far = PolicyDocument::new()
            .with(FactKey::HoldsBall, false)
            .with(FactKey::BallDistance, 3i64);

        assert!(evaluate(&policy, &near).is_satisfied());
        assert_eq!(
            evaluate(&policy, &far)
                .residual()
                .map(|r| r.conflicts.len()),
            Some(2)
        );
    }

    #[test]
    fn mistyped_facts_conflict() {
        let doc = PolicyDocument::new().with(FactKey::BallDistance, true);
        assert!(!evaluate(&Expr::at_least(FactKey::BallDistance, 0), &doc).is_satisfied());
    }

    #[test]
    fn empty_all_is_satisfied() {
        assert!(evaluate(&Expr::all([]), &PolicyDocument::new()).is_satisfied());
    }
}
