//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! action passes through the same phases:
//! schema → pending-choice gate → policy → apply → post-validate.
//!
//! The engine never mutates its inputs. A successful action returns a
//! [`Transition`] holding the next state, the next trigger registry and the
//! event appended to the log; any error leaves the caller's values as they
//! were.
mod errors;
mod replay;
#[cfg(feature = "serde")]
mod root;

pub use errors::{
    ExecuteError, ReplayError, RuleViolation, TransitionPhase, TransitionPhaseError,
};
pub use replay::replay;
#[cfg(feature = "serde")]
pub use root::state_root;

use crate::action::{self, Action};
use crate::effect::{ApplyOptions, AppliedEffect, Pending, apply_effect};
use crate::env::GameEnv;
use crate::policy::{Evaluation, PolicyRegistry};
use crate::state::{Bindings, Event, GameState, Value, invariants};
use crate::trigger::TriggerState;

/// Everything a successful action produced.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: GameState,
    pub triggers: TriggerState,
    /// The entry appended to `state.events`.
    pub event: Event,
    pub applied: Vec<AppliedEffect>,
    pub pending: Option<Pending>,
    /// A before-trigger cancelled the action's request event.
    pub prevented: bool,
}

/// Validates and applies actions against a fixed environment and rule set.
#[derive(Debug)]
pub struct GameEngine<'a> {
    env: GameEnv<'a>,
    policies: PolicyRegistry,
}

impl<'a> GameEngine<'a> {
    /// Engine enforcing the standard policies.
    pub fn new(env: GameEnv<'a>) -> Self {
        Self::with_policies(env, PolicyRegistry::standard())
    }

    pub fn with_policies(env: GameEnv<'a>, policies: PolicyRegistry) -> Self {
        Self { env, policies }
    }

    pub fn env(&self) -> GameEnv<'a> {
        self.env
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    /// Policy verdict for `action` without applying it.
    pub fn evaluate(&self, state: &GameState, action: &Action) -> Evaluation {
        self.policies.evaluate(state, action)
    }

    /// Applies one action and appends it to the event log.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::Schema`] when the action references something that
    ///   does not exist
    /// - [`ExecuteError::Rule`] when a choice is pending, a policy is not
    ///   satisfied, an effect fails or the result breaks a board invariant.
    ///   A failing choice continuation is not an error: the choice is
    ///   cleared and the event carries [`Event::CONTINUATION_FAILED`]
    /// - [`ExecuteError::Fault`] when the run aborts (recursion limit, choice
    ///   misuse)
    pub fn apply_action(
        &self,
        state: &GameState,
        triggers: &TriggerState,
        action: &Action,
    ) -> Result<Transition, ExecuteError> {
        let action_type = action.action_type();
        tracing::debug!(
            target: "hexball::engine",
            action = %action_type,
            clock = %state.clock,
            "applying action"
        );

        action::validate(action, state)?;

        if let Some(choice) = &state.pending_choice
            && !matches!(action, Action::ResolveChoice { .. })
        {
            return Err(ExecuteError::rule(
                TransitionPhase::Policy,
                RuleViolation::ChoicePending { choice: choice.id },
            ));
        }

        if let Evaluation::Residual(residual) = self.policies.evaluate(state, action) {
            tracing::debug!(
                target: "hexball::engine",
                action = %action_type,
                conflicts = residual.conflicts.len(),
                open = residual.open.len(),
                "policy rejected action"
            );
            let explanations = residual.explain(action_type);
            return Err(ExecuteError::rule(
                TransitionPhase::Policy,
                RuleViolation::Policy {
                    action: action_type,
                    residual,
                    explanations,
                },
            ));
        }

        let root = action.root_effect(state);
        let outcome = apply_effect(
            self.env,
            state,
            triggers,
            &root,
            &Bindings::new(),
            ApplyOptions::live(),
        )
        .map_err(|fault| {
            tracing::warn!(
                target: "hexball::engine",
                action = %action_type,
                %fault,
                "action aborted"
            );
            ExecuteError::fault(TransitionPhase::Apply, fault)
        })?;

        if let Some(failure) = outcome.first_failure() {
            return Err(ExecuteError::rule(
                TransitionPhase::Apply,
                RuleViolation::EffectFailed {
                    effect: failure.effect,
                    error: failure.error.clone(),
                },
            ));
        }

        let violations = invariants::check(&outcome.state);
        if !violations.is_empty() {
            tracing::warn!(
                target: "hexball::engine",
                action = %action_type,
                count = violations.len(),
                "post-validation failed"
            );
            return Err(ExecuteError::rule(
                TransitionPhase::PostValidate,
                RuleViolation::Invariant(violations),
            ));
        }

        let continuation_failed = outcome.continuation_failed();
        let mut next = outcome.state;
        let mut event = Event::new(action.clone(), state.clock);
        if outcome.prevented {
            event.data.insert(Event::PREVENTED, true);
        }
        if continuation_failed {
            event.data.insert(Event::CONTINUATION_FAILED, true);
        }
        if let Some(Pending::Choice(choice)) = outcome.pending {
            event.data.insert(Event::PENDING_CHOICE, Value::Choice(choice));
        }
        next.events.push(event.clone());
        next.clock = state.clock.next();

        Ok(Transition {
            state: next,
            triggers: outcome.triggers,
            event,
            applied: outcome.applied,
            pending: outcome.pending,
            prevented: outcome.prevented,
        })
    }
}
