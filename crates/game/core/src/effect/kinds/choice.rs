//! Offering, submitting and resuming choices.

use tracing::{debug, warn};

use crate::effect::{AppliedValue, ChoiceOptions, Effect, EffectError, Executor, Flow, Param};
use crate::error::EngineFault;
use crate::state::{Bindings, ChoiceOption, Continuation, PendingChoice, Player, Team, names};

impl Executor<'_> {
    /// `OfferChoice` and `SubmitChoice`.
    ///
    /// The outer `Result` carries faults that abort the whole run; the inner
    /// one an ordinary effect failure.
    pub(crate) fn apply_choice(
        &mut self,
        effect: &Effect,
        bindings: &Bindings,
    ) -> Result<Result<AppliedValue, EffectError>, EngineFault> {
        match effect {
            Effect::OfferChoice {
                kind,
                team,
                options,
                continuation,
            } => {
                if let Some(existing) = &self.state.pending_choice {
                    return Err(EngineFault::ChoiceAlreadyPending {
                        existing: existing.id,
                    });
                }
                Ok(self.offer_choice(kind, team, options, continuation.as_ref(), bindings))
            }
            Effect::SubmitChoice { choice, option } => {
                let Some(pending) = &self.state.pending_choice else {
                    return Err(EngineFault::NoPendingChoice);
                };
                if let Some(requested) = *choice
                    && requested != pending.id
                {
                    return Err(EngineFault::ChoiceMismatch {
                        requested,
                        pending: pending.id,
                    });
                }
                Ok(option
                    .resolve(bindings)
                    .and_then(|option| self.submit_choice(option)))
            }
            _ => Ok(Ok(AppliedValue::None)),
        }
    }

    fn offer_choice(
        &mut self,
        kind: &str,
        team: &Param<Team>,
        options: &ChoiceOptions,
        continuation: Option<&Continuation>,
        bindings: &Bindings,
    ) -> Result<AppliedValue, EffectError> {
        let team = team.resolve(bindings)?;
        let options = match options {
            ChoiceOptions::Fixed(options) => options.clone(),
            ChoiceOptions::Teammates { of } => {
                let of = of.resolve(bindings)?;
                let team = self.player_ref(of)?.team;
                player_options(self.state.on_court(team).filter(|p| p.id != of))
            }
            ChoiceOptions::OnCourt { team } => {
                let team = team.resolve(bindings)?;
                player_options(self.state.on_court(team))
            }
        };
        if options.is_empty() {
            return Err(EffectError::EmptyChoice(kind.to_owned()));
        }

        let id = self.state.choice_id();
        debug!(
            target: "hexball::effect",
            choice = %id,
            kind,
            %team,
            options = options.len(),
            "choice offered"
        );
        self.state.pending_choice = Some(PendingChoice {
            id,
            kind: kind.to_owned(),
            options,
            team,
            selected: None,
            continuation: continuation.cloned(),
            bindings: bindings.clone(),
        });
        Ok(AppliedValue::ChoiceOffered(id))
    }

    fn submit_choice(&mut self, option: i64) -> Result<AppliedValue, EffectError> {
        let Some(pending) = self.state.pending_choice.as_mut() else {
            return Ok(AppliedValue::ChoiceCleared);
        };
        let unknown = EffectError::UnknownOption {
            choice: pending.id,
            option,
        };
        let id = u32::try_from(option).map_err(|_| unknown.clone())?;
        if pending.option(id).is_none() {
            return Err(unknown);
        }
        pending.selected = Some(id);
        Ok(AppliedValue::ChoiceSubmitted {
            choice: pending.id,
            option: id,
        })
    }

    /// Runs the pending choice's continuation and clears the choice.
    ///
    /// The continuation sees the bindings in scope here, overlaid with the
    /// ones captured when the choice was offered, plus `choice-selected`.
    /// The choice is cleared whatever the continuation does: a failing
    /// continuation is rolled back as a whole and recorded, not propagated,
    /// and any card whose resolution waited on it goes to the discard pile.
    pub(crate) fn execute_continuation(&mut self, bindings: &Bindings) -> Result<Flow, EngineFault> {
        let Some(choice) = self.state.pending_choice.take() else {
            self.record("execute-choice-continuation", AppliedValue::ChoiceCleared);
            return Ok(Flow::Continue);
        };
        let Some(continuation) = &choice.continuation else {
            self.record("execute-choice-continuation", AppliedValue::ChoiceCleared);
            return Ok(Flow::Continue);
        };

        let mut scope = bindings.merged(&choice.bindings);
        if let Some(option) = choice.selected_option() {
            scope.insert(names::CHOICE_SELECTED, option.value.clone());
        }
        debug!(
            target: "hexball::effect",
            choice = %choice.id,
            selected = ?choice.selected,
            "resuming choice continuation"
        );

        let checkpoint = self.checkpoint();
        let mark = self.failure_mark();
        self.record(
            "execute-choice-continuation",
            AppliedValue::ContinuationExecuted(choice.id),
        );
        let flow = match continuation {
            Continuation::Single(effect) => self.run(effect, &scope)?,
            Continuation::Sequence(effects) => self.run_sequence(effects, &scope)?,
        };
        if flow == Flow::Halt {
            self.restore(checkpoint);
            // cards waiting on this choice fizzle instead of staying on the stack
            self.fizzle_stack();
            let failure = self.take_failures_since(mark).into_iter().next();
            warn!(
                target: "hexball::effect",
                choice = %choice.id,
                effect = failure.as_ref().map(|f| f.effect),
                "choice continuation failed; choice cleared"
            );
            self.record(
                "execute-choice-continuation",
                AppliedValue::ContinuationFailed {
                    choice: choice.id,
                    failure,
                },
            );
        }
        Ok(Flow::Continue)
    }
}

fn player_options<'p>(players: impl Iterator<Item = &'p Player>) -> Vec<ChoiceOption> {
    players
        .zip(1u32..)
        .map(|(player, id)| ChoiceOption::new(id, player.card.to_string(), player.id))
        .collect()
}
