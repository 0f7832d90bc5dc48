//! Deterministic rules core for a hex-grid team-sports card game.
//!
//! `hexball-core` decides whether an action is legal, computes its
//! consequences through a closed set of effects, lets card-driven triggers
//! react to request events without runaway recursion, and records a
//! replayable event log. All state transitions flow through
//! [`engine::GameEngine`]; card content is supplied from outside through the
//! [`env::CardCatalog`] oracle.
pub mod action;
pub mod board;
pub mod config;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod policy;
pub mod rules;
pub mod state;
pub mod trigger;

pub use action::{Action, ActionType, SchemaError};
pub use board::{Board, Position, Terrain};
pub use config::GameConfig;
pub use effect::{
    ApplyOptions, AppliedEffect, AppliedValue, Effect, EffectError, EffectFailure, EffectOutcome,
    EventTemplate, Param, Pending,
};
pub use engine::{
    ExecuteError, GameEngine, ReplayError, RuleViolation, Transition, TransitionPhase, replay,
};
pub use env::{
    CardCatalog, CardDefinition, CardKind, GameEnv, InMemoryCatalog, OracleError, PcgRng,
    RngOracle, TriggerSpec,
};
pub use error::{EngineFault, ErrorSeverity, GameError};
pub use policy::{Evaluation, Explanation, FactKey, PolicyRegistry, Residual};
pub use state::{
    AdvantageLevel, AdvantageSource, BallState, Bindings, CardInstance, CardRef, ChoiceId,
    ChoiceOption, Continuation, Deck, Event, Expiry, FlightKind, GameState, InitialLayout,
    InstanceId, PendingChoice, PendingSkillTest, Phase, Pile, Player, PlayerId, Size,
    SkillTestKind, Stat, Stats, Team, Tick, Value,
};
pub use trigger::{
    Causation, Condition, EventKind, EventMask, Provenance, RequestEvent, SourceId, Timing,
    Trigger, TriggerId, TriggerRegistry, TriggerState,
};
