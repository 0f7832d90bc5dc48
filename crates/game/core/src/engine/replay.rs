//! Rebuilding a state from its recorded history.

use super::errors::ReplayError;
use crate::action::Action;
use crate::effect::{ApplyOptions, apply_effect};
use crate::env::GameEnv;
use crate::state::{Bindings, Event, GameState};
use crate::trigger::TriggerState;

/// Re-applies `events` on top of `initial`.
///
/// Only each action's own effects run: triggers are not fired and policies
/// are not consulted, since the log already records accepted actions.
/// Prevented events and choice resolutions with nothing pending are carried
/// into the log without effect. The returned state's log is `initial`'s log
/// followed by `events`.
///
/// # Errors
///
/// Returns a [`ReplayError`] if an event's timestamp does not continue the
/// clock, or if re-applying it fails.
pub fn replay(
    env: GameEnv<'_>,
    initial: &GameState,
    events: &[Event],
) -> Result<GameState, ReplayError> {
    let mut state = initial.clone();
    let mut triggers = TriggerState::new();

    for (index, event) in events.iter().enumerate() {
        if event.timestamp != state.clock {
            return Err(ReplayError::ClockMismatch {
                index,
                expected: state.clock,
                found: event.timestamp,
            });
        }

        let skip = event.was_prevented()
            || (matches!(event.action, Action::ResolveChoice { .. })
                && state.pending_choice.is_none());

        if skip {
            tracing::trace!(
                target: "hexball::replay",
                index,
                action = %event.action.action_type(),
                "skipping event"
            );
        } else {
            let root = event.action.root_effect(&state);
            let outcome = apply_effect(
                env,
                &state,
                &triggers,
                &root,
                &Bindings::new(),
                ApplyOptions::replay(),
            )
            .map_err(|fault| ReplayError::Fault { index, fault })?;

            if let Some(failure) = outcome.first_failure() {
                return Err(ReplayError::EffectFailed {
                    index,
                    effect: failure.effect,
                    error: failure.error.clone(),
                });
            }
            state = outcome.state;
            triggers = outcome.triggers;
        }

        state.events.push(event.clone());
        state.clock = state.clock.next();
    }

    tracing::debug!(
        target: "hexball::replay",
        events = events.len(),
        clock = %state.clock,
        "replay finished"
    );
    Ok(state)
}
