//! Result records produced by the effect engine.

use super::EffectError;
use crate::board::Position;
use crate::rules::skill::SkillTestResult;
use crate::state::{
    AdvantageLevel, BallState, ChoiceId, GameState, InstanceId, Phase, PlayerId, Team,
};
use crate::trigger::{EventKind, TriggerId, TriggerState};

/// What a successfully applied effect did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppliedValue {
    Moved {
        player: PlayerId,
        from: Position,
        to: Position,
    },
    Placed {
        player: PlayerId,
        at: Position,
    },
    Benched {
        player: PlayerId,
        from: Position,
    },
    Exhausted(PlayerId),
    Refreshed {
        players: usize,
    },
    ModifierAdded(PlayerId),
    ModifiersExpired {
        count: usize,
    },
    Drew {
        team: Team,
        cards: Vec<InstanceId>,
        reshuffled: bool,
    },
    Discarded {
        team: Team,
        card: InstanceId,
    },
    Shuffled(Team),
    Stacked(InstanceId),
    StackResolved(InstanceId),
    Attached {
        card: InstanceId,
        player: PlayerId,
        triggers: usize,
    },
    AssetPlayed {
        card: InstanceId,
        triggers: usize,
    },
    LeftPlay {
        card: InstanceId,
        triggers: usize,
    },
    TriggerRegistered(TriggerId),
    Ball(BallState),
    Scored {
        team: Team,
        points: u32,
    },
    PhaseSet(Phase),
    ActiveTeam(Team),
    TurnAdvanced {
        turn: u32,
        quarter: u8,
    },
    EventFired(EventKind),
    Prevented(EventKind),
    EventAdjusted {
        key: String,
    },
    ChoiceOffered(ChoiceId),
    ChoiceSubmitted {
        choice: ChoiceId,
        option: u32,
    },
    ContinuationExecuted(ChoiceId),
    /// The continuation failed and was rolled back; the choice is cleared.
    ContinuationFailed {
        choice: ChoiceId,
        failure: Option<EffectFailure>,
    },
    ChoiceCleared,
    SkillTestOpened(u32),
    SkillBonusAdded,
    AdvantageAdded(AdvantageLevel),
    SkillTestResolved(SkillTestResult),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedEffect {
    /// Tag of the effect that produced the value.
    pub effect: &'static str,
    pub value: AppliedValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectFailure {
    pub effect: &'static str,
    pub error: EffectError,
}

/// Marker for work that could not complete synchronously.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pending {
    /// A choice is parked in state and must be resolved before play continues.
    Choice(ChoiceId),
}

/// Everything one effect application produced.
#[derive(Clone, Debug)]
pub struct EffectOutcome {
    pub state: GameState,
    pub triggers: TriggerState,
    pub applied: Vec<AppliedEffect>,
    pub failures: Vec<EffectFailure>,
    pub pending: Option<Pending>,
    /// The outermost request event was prevented by a before-trigger.
    pub prevented: bool,
}

impl EffectOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn first_failure(&self) -> Option<&EffectFailure> {
        self.failures.first()
    }

    /// Whether a choice continuation was abandoned during this run.
    pub fn continuation_failed(&self) -> bool {
        self.applied
            .iter()
            .any(|a| matches!(a.value, AppliedValue::ContinuationFailed { .. }))
    }

    /// Applied values produced by effects with the given tag.
    pub fn values_of<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a AppliedValue> {
        self.applied
            .iter()
            .filter(move |a| a.effect == tag)
            .map(|a| &a.value)
    }
}
