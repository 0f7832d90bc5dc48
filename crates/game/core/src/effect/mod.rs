//! Effect engine.
//!
//! Effects are the internal, composable units of state change. Actions
//! decompose into request events whose default rules are effects, and card
//! content is expressed entirely as effects.
//!
//! The set of effects is closed: [`Effect`] is a single enum and the executor
//! matches it exhaustively, so adding a variant without a handler is a compile
//! error. Parameters are either literal values or names resolved from the
//! [`Bindings`] in scope when the effect runs.
//!
//! Each primitive follows the same three steps:
//! 1. resolve parameters and validate against the working state
//! 2. apply the mutation
//! 3. optionally post-validate board invariants
//!
//! A primitive never mutates before validation passes, and composite effects
//! restore the checkpoint taken before a failing child, so a failed effect
//! leaves the state exactly as it was before that effect started.
mod context;
mod error;
mod executor;
mod kinds;
mod result;

use std::collections::BTreeMap;

pub use context::FromValue;
pub use error::EffectError;
pub(crate) use executor::{EventFrame, Executor, Flow, Stage};
pub use result::{AppliedEffect, AppliedValue, EffectFailure, EffectOutcome, Pending};

use crate::env::{GameEnv, TriggerSpec};
use crate::error::EngineFault;
use crate::state::{
    AdvantageSource, Bindings, Bonus, ChoiceId, ChoiceOption, Continuation, Expiry, FlightKind,
    GameState, InstanceId, Phase, PlayerId, Position, Stat, StatModifier, Team, Value,
};
use crate::trigger::{Condition, EventKind, RequestEvent, TriggerState};

/// A literal value or the name of a binding to resolve at run time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Param<T> {
    Value(T),
    Bound(String),
}

impl<T> Param<T> {
    pub fn bound(name: impl Into<String>) -> Self {
        Param::Bound(name.into())
    }
}

impl<T> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Param::Value(value)
    }
}

/// How [`Effect::AdjustEvent`] changes a payload field of the event in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Adjustment {
    Set(Param<Value>),
    /// Adds to an integer field; a missing field counts as zero.
    Add(i64),
}

/// Where the options of an [`Effect::OfferChoice`] come from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChoiceOptions {
    Fixed(Vec<ChoiceOption>),
    /// On-court teammates of a player, the player excluded.
    Teammates { of: Param<PlayerId> },
    /// On-court players of a team.
    OnCourt { team: Param<Team> },
}

/// Skill-test flavour requested by [`Effect::InitiateSkillTest`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestSpec {
    Shot,
    Pass { receiver: Param<PlayerId> },
    Generic,
}

/// A request event with unresolved parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventTemplate {
    pub kind: EventKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub team: Option<Param<Team>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub player: Option<Param<PlayerId>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub payload: BTreeMap<String, Param<Value>>,
}

impl EventTemplate {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            team: None,
            player: None,
            payload: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn team(mut self, team: impl Into<Param<Team>>) -> Self {
        self.team = Some(team.into());
        self
    }

    #[must_use]
    pub fn player(mut self, player: impl Into<Param<PlayerId>>) -> Self {
        self.player = Some(player.into());
        self
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Param<Value>>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }

    /// Literal template for an already-built request event.
    pub fn from_event(event: &RequestEvent) -> Self {
        Self {
            kind: event.kind,
            team: event.team.map(Param::Value),
            player: event.player.map(Param::Value),
            payload: event
                .payload
                .iter()
                .map(|(k, v)| (k.to_owned(), Param::Value(v.clone())))
                .collect(),
        }
    }

    pub fn resolve(&self, bindings: &Bindings) -> Result<RequestEvent, EffectError> {
        let mut event = RequestEvent::new(self.kind);
        if let Some(team) = &self.team {
            event.team = Some(team.resolve(bindings)?);
        }
        if let Some(player) = &self.player {
            event.player = Some(player.resolve(bindings)?);
        }
        for (key, value) in &self.payload {
            event.payload.insert(key.as_str(), value.resolve(bindings)?);
        }
        Ok(event)
    }
}

/// The closed set of effects.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum Effect {
    // ===== composition =====
    /// Runs in order; stops at the first failure after restoring the state
    /// from before the failing child.
    Sequence(Vec<Effect>),
    /// Runs `effect` with extra bindings layered over the current ones.
    Scoped {
        bindings: Bindings,
        effect: Box<Effect>,
    },
    Conditional {
        condition: Condition,
        then: Box<Effect>,
        #[cfg_attr(feature = "serde", serde(default))]
        otherwise: Option<Box<Effect>>,
    },

    // ===== players =====
    MovePlayer {
        player: Param<PlayerId>,
        to: Param<Position>,
    },
    PlacePlayer {
        player: Param<PlayerId>,
        at: Param<Position>,
    },
    RemoveFromCourt {
        player: Param<PlayerId>,
    },
    ExhaustPlayer {
        player: Param<PlayerId>,
    },
    RefreshPlayer {
        player: Param<PlayerId>,
    },
    RefreshTeam {
        team: Param<Team>,
    },
    AddModifier {
        player: Param<PlayerId>,
        modifier: StatModifier,
    },
    ExpireModifiers(Expiry),

    // ===== cards =====
    DrawCards {
        team: Param<Team>,
        count: Param<i64>,
    },
    DiscardCard {
        team: Param<Team>,
        card: Param<InstanceId>,
    },
    ShuffleDeck {
        team: Param<Team>,
    },
    PushStack {
        team: Param<Team>,
        card: Param<InstanceId>,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<Param<PlayerId>>,
    },
    /// Pops the top stack entry into its owner's discard pile.
    ResolveStackTop,
    AttachCard {
        team: Param<Team>,
        card: Param<InstanceId>,
        player: Param<PlayerId>,
    },
    PlayAsset {
        team: Param<Team>,
        card: Param<InstanceId>,
    },
    /// Discards an attached or in-play card and unregisters its triggers.
    RemoveFromPlay {
        card: Param<InstanceId>,
    },
    /// Registers a trigger owned by the `card`/`owner`/`self` bindings in scope.
    RegisterTrigger(Box<TriggerSpec>),

    // ===== ball & score =====
    GiveBall {
        player: Param<PlayerId>,
    },
    LooseBall {
        at: Param<Position>,
    },
    LaunchBall {
        from: Param<Position>,
        to: Param<Position>,
        kind: FlightKind,
    },
    AddScore {
        team: Param<Team>,
        points: Param<i64>,
    },

    // ===== turn structure =====
    SetPhase(Phase),
    SetActiveTeam {
        team: Param<Team>,
    },
    AdvanceTurn,

    // ===== events =====
    FireEvent(EventTemplate),
    /// Marks the event in flight as prevented; only valid in a before-trigger.
    Prevent,
    AdjustEvent {
        key: String,
        adjustment: Adjustment,
    },

    // ===== choices =====
    OfferChoice {
        kind: String,
        team: Param<Team>,
        options: ChoiceOptions,
        #[cfg_attr(feature = "serde", serde(default))]
        continuation: Option<Continuation>,
    },
    SubmitChoice {
        #[cfg_attr(feature = "serde", serde(default))]
        choice: Option<ChoiceId>,
        option: Param<i64>,
    },
    ExecuteChoiceContinuation,

    // ===== skill tests =====
    InitiateSkillTest {
        actor: Param<PlayerId>,
        stat: Stat,
        test: TestSpec,
    },
    AddSkillBonus(Bonus),
    AddAdvantage(AdvantageSource),
    ResolveSkillTest,

    Noop,
}

impl Effect {
    /// Kebab-case tag of the variant, e.g. `"draw-cards"`.
    pub fn tag(&self) -> &'static str {
        self.into()
    }

    pub fn sequence(effects: impl IntoIterator<Item = Effect>) -> Effect {
        Effect::Sequence(effects.into_iter().collect())
    }

    pub fn scoped(bindings: Bindings, effect: Effect) -> Effect {
        Effect::Scoped {
            bindings,
            effect: Box::new(effect),
        }
    }

    pub fn when(condition: Condition, then: Effect) -> Effect {
        Effect::Conditional {
            condition,
            then: Box::new(then),
            otherwise: None,
        }
    }

    pub fn fire(template: EventTemplate) -> Effect {
        Effect::FireEvent(template)
    }

    pub fn draw(team: impl Into<Param<Team>>, count: i64) -> Effect {
        Effect::DrawCards {
            team: team.into(),
            count: Param::Value(count),
        }
    }

    pub fn exhaust(player: impl Into<Param<PlayerId>>) -> Effect {
        Effect::ExhaustPlayer {
            player: player.into(),
        }
    }

    pub fn give_ball(player: impl Into<Param<PlayerId>>) -> Effect {
        Effect::GiveBall {
            player: player.into(),
        }
    }

    pub fn move_player(player: impl Into<Param<PlayerId>>, to: impl Into<Param<Position>>) -> Effect {
        Effect::MovePlayer {
            player: player.into(),
            to: to.into(),
        }
    }
}

/// Execution switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Run registered triggers; when off only the catchall rules run.
    pub fire_triggers: bool,
    /// Check board invariants after every primitive.
    pub validate: bool,
}

impl ApplyOptions {
    /// Live play: triggers on, invariants checked.
    pub const fn live() -> Self {
        Self {
            fire_triggers: true,
            validate: true,
        }
    }

    /// Replay: terminal effects only.
    pub const fn replay() -> Self {
        Self {
            fire_triggers: false,
            validate: false,
        }
    }
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self::live()
    }
}

/// Applies one effect to a snapshot and returns the resulting snapshot.
///
/// Neither `state` nor `triggers` is touched; the outcome carries the new
/// values. Effect failures are reported in [`EffectOutcome::failures`] with
/// the state rolled back to the last successful point.
///
/// # Errors
///
/// Returns an [`EngineFault`] when the run had to be aborted entirely
/// (recursion limit, choice referenced without a pending record).
pub fn apply_effect(
    env: GameEnv<'_>,
    state: &GameState,
    triggers: &TriggerState,
    effect: &Effect,
    bindings: &Bindings,
    options: ApplyOptions,
) -> Result<EffectOutcome, EngineFault> {
    // effects never read the log, so checkpoints are taken without it
    let mut executor = Executor::new(env, options, state.without_events(), triggers.clone());
    executor.run(effect, bindings)?;
    let mut outcome = executor.finish();
    outcome.state.events = state.events.clone();
    Ok(outcome)
}
