//! Constraint-based action validation.
//!
//! Every [`ActionType`](crate::action::ActionType) may have one policy: an
//! [`Expr`] tree of [`Constraint`]s over named facts. Facts are extracted
//! from the state and the proposed action into a [`PolicyDocument`];
//! evaluating the policy against it either satisfies it or leaves a
//! [`Residual`] listing the facts that conflict and the ones that could not
//! be established. Nothing here mutates state.
mod affordances;
mod document;
mod explain;
mod expr;
mod registry;

pub use affordances::{available_actions, legal_destinations, legal_pass_targets};
pub use document::{FactKey, FactValue, PolicyDocument};
pub use explain::{Explanation, explain};
pub use expr::{Conflict, Constraint, Evaluation, Expr, Residual, evaluate};
pub use registry::PolicyRegistry;
