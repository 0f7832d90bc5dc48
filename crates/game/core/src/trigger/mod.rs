//! Trigger and causation engine.
//!
//! A logical occurrence becomes a [`RequestEvent`]. Firing it runs every
//! registered [`Trigger`] listening for that kind, before and after the
//! built-in catchall rule performs the default state change. The
//! [`Causation`] record threaded through one root action keeps a trigger from
//! re-entering itself, and a hard depth ceiling turns runaway chains into a
//! fault instead of a hang.
mod catchall;
mod causation;
mod condition;
mod dispatch;
mod event;
mod registry;

pub(crate) use catchall::default_effect;
pub use causation::Causation;
pub use condition::{Condition, Relation, TriggerDocument};
pub use event::{EventKind, EventMask, RequestEvent, keys};
pub use registry::{OccurrenceCounter, TriggerId, TriggerRegistry, TriggerState};

use crate::effect::Effect;
use crate::state::{InstanceId, PlayerId, Team};

/// Whether a trigger runs before or after the default rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum Timing {
    /// May adjust or prevent the event.
    Before,
    #[default]
    After,
}

/// Identity of whatever registered a trigger.
///
/// All triggers sharing a source are removed together when it leaves play,
/// and a source already executing in the causation chain is not re-entered.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceId {
    Card(InstanceId),
    Player(PlayerId),
    Named(String),
}

impl core::fmt::Display for SourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceId::Card(id) => write!(f, "{id}"),
            SourceId::Player(id) => write!(f, "{id}"),
            SourceId::Named(name) => f.write_str(name),
        }
    }
}

/// Where a trigger came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Provenance {
    pub source: SourceId,
    /// The owning team; bound as `owner` while the trigger runs.
    pub team: Team,
    /// Bound as `self` while the trigger runs.
    pub player: Option<PlayerId>,
    /// Bound as `card` while the trigger runs.
    pub card: Option<InstanceId>,
}

impl Provenance {
    pub fn new(source: SourceId, team: Team) -> Self {
        Self {
            source,
            team,
            player: None,
            card: None,
        }
    }

    /// Provenance of a card in play, optionally attached to a player.
    pub fn card(card: InstanceId, team: Team, player: Option<PlayerId>) -> Self {
        Self {
            source: SourceId::Card(card),
            team,
            player,
            card: Some(card),
        }
    }

    #[must_use]
    pub fn for_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }
}

/// A registered reaction to request events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trigger {
    pub events: EventMask,
    pub timing: Timing,
    pub condition: Option<Condition>,
    /// Higher fires first; ties go to the earlier registration.
    pub priority: i32,
    /// Removed after it first fires.
    pub once: bool,
    /// Exempt from the causation-chain guard (never from the depth ceiling).
    pub reentrant: bool,
    pub effect: Effect,
    pub provenance: Provenance,
}

impl Trigger {
    pub fn new(events: impl Into<EventMask>, effect: Effect, provenance: Provenance) -> Self {
        Self {
            events: events.into(),
            timing: Timing::After,
            condition: None,
            priority: 0,
            once: false,
            reentrant: false,
            effect,
            provenance,
        }
    }

    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn before(self) -> Self {
        self.with_timing(Timing::Before)
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    #[must_use]
    pub fn reentrant(mut self) -> Self {
        self.reentrant = true;
        self
    }

    pub fn source(&self) -> &SourceId {
        &self.provenance.source
    }
}
