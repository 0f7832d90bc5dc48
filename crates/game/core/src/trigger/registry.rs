//! Trigger registry and per-turn occurrence counter.
//!
//! Both are plain values. Public operations take the registry by value and
//! hand back the updated one (`registry' = register(registry, trigger)`);
//! the executor threads a working copy through one root action and returns
//! it in the outcome.

use std::collections::BTreeMap;

use super::{EventKind, SourceId, Timing, Trigger};
use crate::state::Team;

/// Registration handle; also the tie-break order (earlier wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(pub u64);

impl core::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "trigger#{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerRegistry {
    entries: BTreeMap<TriggerId, Trigger>,
    next_id: u64,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry with `trigger` added, plus its handle.
    #[must_use]
    pub fn register(mut self, trigger: Trigger) -> (Self, TriggerId) {
        let id = self.insert(trigger);
        (self, id)
    }

    /// Returns the registry without the trigger behind `id`.
    #[must_use]
    pub fn unregister(mut self, id: TriggerId) -> Self {
        self.entries.remove(&id);
        self
    }

    /// Returns the registry without any trigger from `source`.
    #[must_use]
    pub fn unregister_source(mut self, source: &SourceId) -> Self {
        self.remove_source(source);
        self
    }

    pub(crate) fn insert(&mut self, trigger: Trigger) -> TriggerId {
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, trigger);
        id
    }

    pub(crate) fn remove(&mut self, id: TriggerId) -> Option<Trigger> {
        self.entries.remove(&id)
    }

    pub(crate) fn remove_source(&mut self, source: &SourceId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, t| t.source() != source);
        before - self.entries.len()
    }

    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: TriggerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TriggerId, &Trigger)> {
        self.entries.iter().map(|(id, t)| (*id, t))
    }

    pub fn from_source<'a>(
        &'a self,
        source: &'a SourceId,
    ) -> impl Iterator<Item = (TriggerId, &'a Trigger)> {
        self.iter().filter(move |(_, t)| t.source() == source)
    }

    /// Triggers listening for `kind` at `timing`, in firing order:
    /// descending priority, then registration order.
    pub fn eligible(&self, kind: EventKind, timing: Timing) -> Vec<(TriggerId, Trigger)> {
        let mut matching: Vec<(TriggerId, Trigger)> = self
            .entries
            .iter()
            .filter(|(_, t)| t.timing == timing && t.events.listens_to(kind))
            .map(|(id, t)| (*id, t.clone()))
            .collect();
        matching.sort_by(|(a_id, a), (b_id, b)| {
            b.priority.cmp(&a.priority).then(a_id.cmp(b_id))
        });
        matching
    }
}

/// How many times each event kind has fired for each team this turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccurrenceCounter {
    turn: u32,
    counts: BTreeMap<(EventKind, Option<Team>), u32>,
}

impl OccurrenceCounter {
    /// Counts one more occurrence and returns the new total.
    ///
    /// Counts from earlier turns are dropped the first time a later turn is seen.
    pub fn bump(&mut self, turn: u32, kind: EventKind, team: Option<Team>) -> u32 {
        if turn != self.turn {
            self.counts.clear();
            self.turn = turn;
        }
        let count = self.counts.entry((kind, team)).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, turn: u32, kind: EventKind, team: Option<Team>) -> u32 {
        if turn != self.turn {
            return 0;
        }
        self.counts.get(&(kind, team)).copied().unwrap_or(0)
    }
}

/// Process state threaded beside [`crate::state::GameState`]; never persisted in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    pub registry: TriggerRegistry,
    pub occurrences: OccurrenceCounter,
}

impl TriggerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: TriggerRegistry) -> Self {
        Self {
            registry,
            occurrences: OccurrenceCounter::default(),
        }
    }

    /// Returns the state with `trigger` registered.
    #[must_use]
    pub fn register(self, trigger: Trigger) -> (Self, TriggerId) {
        let (registry, id) = self.registry.register(trigger);
        (
            Self {
                registry,
                occurrences: self.occurrences,
            },
            id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::trigger::Provenance;

    fn trigger(source: &str, priority: i32) -> Trigger {
        Trigger::new(
            EventKind::DrawCards,
            Effect::Noop,
            Provenance::new(SourceId::Named(source.into()), Team::Home),
        )
        .with_priority(priority)
    }

    #[test]
    fn eligible_orders_by_priority_then_registration() {
        let registry = TriggerRegistry::new();
        let (registry, low) = registry.register(trigger("low", 0));
        let (registry, high) = registry.register(trigger("high", 5));
        let (registry, low_again) = registry.register(trigger("low-2", 0));

        let order: Vec<_> = registry
            .eligible(EventKind::DrawCards, Timing::After)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(order, vec![high, low, low_again]);
        assert!(registry.eligible(EventKind::Shoot, Timing::After).is_empty());
        assert!(registry.eligible(EventKind::DrawCards, Timing::Before).is_empty());
    }

    #[test]
    fn unregister_source_drops_every_trigger_of_that_source() {
        let (registry, _) = TriggerRegistry::new().register(trigger("asset", 0));
        let (registry, _) = registry.register(trigger("asset", 1));
        let (registry, keep) = registry.register(trigger("other", 0));

        let registry = registry.unregister_source(&SourceId::Named("asset".into()));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(keep));
    }

    #[test]
    fn occurrence_counter_resets_each_turn() {
        let mut counter = OccurrenceCounter::default();
        assert_eq!(counter.bump(1, EventKind::DrawCards, Some(Team::Home)), 1);
        assert_eq!(counter.bump(1, EventKind::DrawCards, Some(Team::Home)), 2);
        assert_eq!(counter.bump(1, EventKind::DrawCards, Some(Team::Away)), 1);
        assert_eq!(counter.count(1, EventKind::DrawCards, Some(Team::Home)), 2);
        assert_eq!(counter.bump(2, EventKind::DrawCards, Some(Team::Home)), 1);
        assert_eq!(counter.count(1, EventKind::DrawCards, Some(Team::Home)), 0);
    }
}
