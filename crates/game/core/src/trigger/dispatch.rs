//! Firing request events through the executor.

use tracing::{debug, trace, warn};

use super::{RequestEvent, Timing, Trigger, TriggerDocument, default_effect};
use crate::config::GameConfig;
use crate::effect::{AppliedValue, Effect, EventFrame, EventTemplate, Executor, Flow, Stage};
use crate::error::EngineFault;
use crate::state::{Bindings, names};

/// Bindings the catchall rule of `event` runs with.
pub(crate) fn event_bindings(event: &RequestEvent) -> Bindings {
    let mut bindings = Bindings::new();
    if let Some(player) = event.player {
        bindings.insert(names::EVENT_PLAYER, player);
    }
    if let Some(team) = event.team {
        bindings.insert(names::EVENT_TEAM, team);
    }
    for (key, value) in event.payload.iter() {
        bindings.insert(format!("{}{key}", names::EVENT_PREFIX), value.clone());
    }
    bindings
}

/// Bindings a trigger's effect runs with: its provenance plus the event.
pub(crate) fn trigger_bindings(trigger: &Trigger, event: &RequestEvent) -> Bindings {
    let provenance = &trigger.provenance;
    let mut bindings = event_bindings(event).with(names::OWNER, provenance.team);
    if let Some(player) = provenance.player {
        bindings.insert(names::SELF, player);
    }
    if let Some(card) = provenance.card {
        bindings.insert(names::CARD, card);
    }
    bindings
}

impl Executor<'_> {
    /// Fires a request event.
    ///
    /// Order: occurrence count, before-triggers, catchall rule, after-triggers.
    /// A prevented event is rolled back to where it started, except that
    /// `once` triggers which fired stay consumed.
    pub(crate) fn fire(&mut self, event: RequestEvent) -> Result<Flow, EngineFault> {
        let depth = self.causation.depth();
        if depth >= GameConfig::MAX_TRIGGER_DEPTH {
            warn!(
                target: "hexball::trigger",
                event = %event.kind,
                depth,
                "trigger recursion limit reached"
            );
            return Err(EngineFault::RecursionLimit {
                depth,
                event: event.kind,
            });
        }

        let checkpoint = self.checkpoint();
        let kind = event.kind;
        let occurrence = self
            .triggers
            .occurrences
            .bump(self.state.turn, kind, event.team);
        debug!(
            target: "hexball::trigger",
            event = %kind,
            team = ?event.team,
            occurrence,
            depth,
            "firing request event"
        );

        self.causation.enter_event();
        self.frames.push(EventFrame {
            event,
            occurrence,
            stage: Stage::Before,
            prevented: false,
            consumed: Vec::new(),
        });
        let flow = self.run_frame();
        let frame = self.frames.pop();
        self.causation.leave_event();
        let flow = flow?;

        if flow == Flow::Halt {
            self.restore(checkpoint);
            return Ok(Flow::Halt);
        }

        let (prevented, consumed) = frame.map_or((false, Vec::new()), |f| (f.prevented, f.consumed));
        if prevented {
            debug!(target: "hexball::trigger", event = %kind, "request event prevented");
            self.restore(checkpoint);
            // a fired `once` trigger stays spent even though its event was undone
            for id in &consumed {
                self.triggers.registry.remove(*id);
            }
            self.record("fire-event", AppliedValue::Prevented(kind));
            if self.causation.depth() == 0 {
                self.root_prevented = true;
            }
        } else {
            self.record("fire-event", AppliedValue::EventFired(kind));
        }
        // an enclosing event that is prevented later must not revive them either
        if let Some(parent) = self.frames.last_mut() {
            parent.consumed.extend(consumed);
        }
        Ok(Flow::Continue)
    }

    fn run_frame(&mut self) -> Result<Flow, EngineFault> {
        if self.options.fire_triggers {
            if self.run_triggers(Timing::Before)? == Flow::Halt {
                return Ok(Flow::Halt);
            }
            if self.frames.last().is_some_and(|f| f.prevented) {
                return Ok(Flow::Continue);
            }
        }

        let Some(frame) = self.frames.last_mut() else {
            return Ok(Flow::Continue);
        };
        frame.stage = Stage::Default;
        let event = frame.event.clone();

        let default = match default_effect(self.env, &self.state, &event) {
            Ok(effect) => effect,
            Err(error) => {
                let rule = Effect::fire(EventTemplate::from_event(&event));
                return Ok(self.fail(&rule, error));
            }
        };
        if self.run(&default, &event_bindings(&event))? == Flow::Halt {
            return Ok(Flow::Halt);
        }

        if let Some(frame) = self.frames.last_mut() {
            frame.stage = Stage::After;
        }
        if self.options.fire_triggers {
            return self.run_triggers(Timing::After);
        }
        Ok(Flow::Continue)
    }

    fn run_triggers(&mut self, timing: Timing) -> Result<Flow, EngineFault> {
        let Some(kind) = self.frames.last().map(|f| f.event.kind) else {
            return Ok(Flow::Continue);
        };

        for (id, trigger) in self.triggers.registry.eligible(kind, timing) {
            // an earlier reaction may have removed it
            if !self.triggers.registry.contains(id) {
                continue;
            }
            if !trigger.reentrant && self.causation.is_active(trigger.source()) {
                trace!(
                    target: "hexball::trigger",
                    trigger = %id,
                    source = %trigger.source(),
                    "source already in causation chain"
                );
                continue;
            }

            let Some((event, occurrence)) = self
                .frames
                .last()
                .map(|f| (f.event.clone(), f.occurrence))
            else {
                return Ok(Flow::Continue);
            };
            let bindings = trigger_bindings(&trigger, &event);
            let passes = trigger.condition.as_ref().is_none_or(|condition| {
                let doc = TriggerDocument::new(&self.state, &bindings).with_event(&event, occurrence);
                condition.evaluate(&doc)
            });
            if !passes {
                continue;
            }

            if trigger.once {
                self.triggers.registry.remove(id);
                if let Some(frame) = self.frames.last_mut() {
                    frame.consumed.push(id);
                }
            }

            debug!(
                target: "hexball::trigger",
                trigger = %id,
                source = %trigger.source(),
                event = %kind,
                ?timing,
                depth = self.causation.depth(),
                "running trigger"
            );
            self.causation.push(trigger.source().clone());
            let flow = self.run(&trigger.effect, &bindings);
            self.causation.pop();
            if flow? == Flow::Halt {
                return Ok(Flow::Halt);
            }

            if timing == Timing::Before && self.frames.last().is_some_and(|f| f.prevented) {
                break;
            }
        }
        Ok(Flow::Continue)
    }
}
