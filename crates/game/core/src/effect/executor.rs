//! The working-copy interpreter behind [`super::apply_effect`].

use tracing::{debug, trace};

use super::{
    AppliedEffect, AppliedValue, ApplyOptions, Effect, EffectError, EffectFailure, EffectOutcome,
    Pending,
};
use crate::env::GameEnv;
use crate::error::EngineFault;
use crate::state::{Bindings, Continuation, GameState, invariants};
use crate::trigger::{Causation, RequestEvent, TriggerDocument, TriggerId, TriggerState};

/// Whether the enclosing composite should keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    /// A child failed; the failure is already recorded.
    Halt,
}

/// Which part of an event's handling is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    Before,
    Default,
    After,
}

/// A request event currently being fired.
#[derive(Clone, Debug)]
pub(crate) struct EventFrame {
    pub(crate) event: RequestEvent,
    pub(crate) occurrence: u32,
    pub(crate) stage: Stage,
    pub(crate) prevented: bool,
    /// `once` triggers that fired for this event.
    pub(crate) consumed: Vec<TriggerId>,
}

pub(crate) struct Checkpoint {
    state: GameState,
    triggers: TriggerState,
    applied: usize,
}

pub(crate) struct Executor<'a> {
    pub(crate) env: GameEnv<'a>,
    pub(crate) options: ApplyOptions,
    pub(crate) state: GameState,
    pub(crate) triggers: TriggerState,
    pub(crate) causation: Causation,
    pub(crate) frames: Vec<EventFrame>,
    applied: Vec<AppliedEffect>,
    failures: Vec<EffectFailure>,
    pub(crate) root_prevented: bool,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(
        env: GameEnv<'a>,
        options: ApplyOptions,
        state: GameState,
        triggers: TriggerState,
    ) -> Self {
        Self {
            env,
            options,
            state,
            triggers,
            causation: Causation::new(),
            frames: Vec::new(),
            applied: Vec::new(),
            failures: Vec::new(),
            root_prevented: false,
        }
    }

    pub(crate) fn finish(self) -> EffectOutcome {
        let pending = self
            .state
            .pending_choice
            .as_ref()
            .map(|choice| Pending::Choice(choice.id));
        EffectOutcome {
            state: self.state,
            triggers: self.triggers,
            applied: self.applied,
            failures: self.failures,
            pending,
            prevented: self.root_prevented,
        }
    }

    // ===== bookkeeping =====

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state.clone(),
            triggers: self.triggers.clone(),
            applied: self.applied.len(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.state = checkpoint.state;
        self.triggers = checkpoint.triggers;
        self.applied.truncate(checkpoint.applied);
    }

    pub(crate) fn failure_mark(&self) -> usize {
        self.failures.len()
    }

    /// Removes the failures recorded after `mark`.
    pub(crate) fn take_failures_since(&mut self, mark: usize) -> Vec<EffectFailure> {
        self.failures.split_off(mark.min(self.failures.len()))
    }

    pub(crate) fn record(&mut self, effect: &'static str, value: AppliedValue) {
        self.applied.push(AppliedEffect { effect, value });
    }

    pub(crate) fn fail(&mut self, effect: &Effect, error: EffectError) -> Flow {
        debug!(
            target: "hexball::effect",
            effect = effect.tag(),
            error = %error,
            "effect failed"
        );
        self.failures.push(EffectFailure {
            effect: effect.tag(),
            error,
        });
        Flow::Halt
    }

    pub(crate) fn settle(
        &mut self,
        effect: &Effect,
        result: Result<AppliedValue, EffectError>,
    ) -> Flow {
        match result {
            Ok(value) => {
                self.record(effect.tag(), value);
                Flow::Continue
            }
            Err(error) => self.fail(effect, error),
        }
    }

    /// Condition document for the current scope and the innermost event in flight.
    pub(crate) fn document<'s>(&'s self, bindings: &'s Bindings) -> TriggerDocument<'s> {
        let doc = TriggerDocument::new(&self.state, bindings);
        match self.frames.last() {
            Some(frame) => doc.with_event(&frame.event, frame.occurrence),
            None => doc,
        }
    }

    // ===== interpretation =====

    pub(crate) fn run(&mut self, effect: &Effect, bindings: &Bindings) -> Result<Flow, EngineFault> {
        trace!(
            target: "hexball::effect",
            effect = effect.tag(),
            depth = self.causation.depth(),
            "applying effect"
        );

        match effect {
            Effect::Sequence(effects) => self.run_sequence(effects, bindings),
            Effect::Scoped {
                bindings: extra,
                effect,
            } => self.run(effect, &bindings.merged(extra)),
            Effect::Conditional {
                condition,
                then,
                otherwise,
            } => {
                let holds = condition.evaluate(&self.document(bindings));
                match (holds, otherwise) {
                    (true, _) => self.run(then, bindings),
                    (false, Some(otherwise)) => self.run(otherwise, bindings),
                    (false, None) => Ok(Flow::Continue),
                }
            }
            Effect::FireEvent(template) => match template.resolve(bindings) {
                Ok(event) => self.fire(event),
                Err(error) => Ok(self.fail(effect, error)),
            },
            Effect::OfferChoice { .. } | Effect::SubmitChoice { .. } => {
                let result = self.apply_choice(effect, bindings)?;
                Ok(self.settle(effect, result))
            }
            Effect::ExecuteChoiceContinuation => self.execute_continuation(bindings),
            Effect::ResolveSkillTest => self.resolve_skill_test(),
            _ => self.run_primitive(effect, bindings),
        }
    }

    /// Runs children in order.
    ///
    /// A failing child is rolled back and stops the sequence. If a child parks
    /// a new choice, the remaining children are appended to that choice's
    /// continuation so they run once the decision is made.
    pub(crate) fn run_sequence(
        &mut self,
        effects: &[Effect],
        bindings: &Bindings,
    ) -> Result<Flow, EngineFault> {
        for (index, effect) in effects.iter().enumerate() {
            let choice_before = self.state.pending_choice.as_ref().map(|c| c.id);
            let checkpoint = self.checkpoint();
            if self.run(effect, bindings)? == Flow::Halt {
                self.restore(checkpoint);
                return Ok(Flow::Halt);
            }

            let rest = &effects[index + 1..];
            if rest.is_empty() {
                continue;
            }
            if let Some(choice) = self.state.pending_choice.as_mut()
                && Some(choice.id) != choice_before
            {
                debug!(
                    target: "hexball::effect",
                    choice = %choice.id,
                    deferred = rest.len(),
                    "deferring rest of sequence behind choice"
                );
                choice.continuation = Some(match choice.continuation.take() {
                    Some(existing) => existing.then(rest.to_vec()),
                    None => Continuation::Sequence(rest.to_vec()),
                });
                choice.bindings = bindings.merged(&choice.bindings);
                return Ok(Flow::Continue);
            }
        }
        Ok(Flow::Continue)
    }

    fn run_primitive(&mut self, effect: &Effect, bindings: &Bindings) -> Result<Flow, EngineFault> {
        let checkpoint = self.options.validate.then(|| self.checkpoint());
        let result = match (self.apply_primitive(effect, bindings), checkpoint) {
            (Ok(value), Some(checkpoint)) => match invariants::check(&self.state).into_iter().next()
            {
                Some(violation) => {
                    self.restore(checkpoint);
                    Err(EffectError::Invariant(violation))
                }
                None => Ok(value),
            },
            (result, _) => result,
        };
        Ok(self.settle(effect, result))
    }
}
