//! Trigger conditions and the read-only document they are evaluated against.

use super::{EventKind, RequestEvent, keys};
use crate::state::{Bindings, GameState, Phase, Player, PlayerId, Team, names};

/// Team relation relative to the trigger's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Own,
    Opponent,
}

/// Predicate over a [`TriggerDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    Always,
    /// True exactly on the n-th firing of the event kind for its team this turn.
    NthOccurrenceThisTurn(u32),
    EventTeam(Relation),
    EventPlayerIsSelf,
    PayloadAtLeast { key: String, value: i64 },
    PayloadFlag(String),
    /// The skill test being reported succeeded by the strong margin.
    StrongSuccess,
    SelfOnCourt,
    SelfHoldsBall,
    PhaseIs(Phase),
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn evaluate(&self, doc: &TriggerDocument<'_>) -> bool {
        match self {
            Condition::Always => true,
            Condition::NthOccurrenceThisTurn(n) => doc.event().is_some() && doc.occurrence() == *n,
            Condition::EventTeam(relation) => match (doc.event_team(), doc.owner()) {
                (Some(team), Some(owner)) => match relation {
                    Relation::Own => team == owner,
                    Relation::Opponent => team == owner.opponent(),
                },
                _ => false,
            },
            Condition::EventPlayerIsSelf => {
                doc.event_player().is_some() && doc.event_player() == doc.self_id()
            }
            Condition::PayloadAtLeast { key, value } => {
                doc.payload_int(key).is_some_and(|v| v >= *value)
            }
            Condition::PayloadFlag(key) => doc.payload_flag(key),
            Condition::StrongSuccess => {
                doc.event_kind() == Some(EventKind::SkillTestResolved)
                    && doc.payload_flag(keys::STRONG)
            }
            Condition::SelfOnCourt => doc.self_player().is_some_and(Player::on_court),
            Condition::SelfHoldsBall => {
                doc.self_id().is_some() && doc.state().ball.holder() == doc.self_id()
            }
            Condition::PhaseIs(phase) => doc.state().phase == *phase,
            Condition::All(all) => all.iter().all(|c| c.evaluate(doc)),
            Condition::Any(any) => any.iter().any(|c| c.evaluate(doc)),
            Condition::Not(inner) => !inner.evaluate(doc),
        }
    }
}

/// Read-only view combining state, the event in flight and the running
/// trigger's bindings.
///
/// Conditions never look at raw maps; they go through the typed accessors
/// below.
#[derive(Clone, Copy, Debug)]
pub struct TriggerDocument<'a> {
    state: &'a GameState,
    event: Option<&'a RequestEvent>,
    bindings: &'a Bindings,
    occurrence: u32,
}

impl<'a> TriggerDocument<'a> {
    pub fn new(state: &'a GameState, bindings: &'a Bindings) -> Self {
        Self {
            state,
            event: None,
            bindings,
            occurrence: 0,
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: &'a RequestEvent, occurrence: u32) -> Self {
        self.event = Some(event);
        self.occurrence = occurrence;
        self
    }

    pub fn state(&self) -> &'a GameState {
        self.state
    }

    pub fn event(&self) -> Option<&'a RequestEvent> {
        self.event
    }

    pub fn event_kind(&self) -> Option<EventKind> {
        self.event.map(|e| e.kind)
    }

    pub fn event_team(&self) -> Option<Team> {
        self.event.and_then(|e| e.team)
    }

    pub fn event_player(&self) -> Option<PlayerId> {
        self.event.and_then(|e| e.player)
    }

    /// Occurrence count of the event in flight for its team this turn.
    pub fn occurrence(&self) -> u32 {
        self.occurrence
    }

    pub fn owner(&self) -> Option<Team> {
        self.bindings.team(names::OWNER)
    }

    pub fn self_id(&self) -> Option<PlayerId> {
        self.bindings.player(names::SELF)
    }

    pub fn self_player(&self) -> Option<&'a Player> {
        self.self_id().and_then(|id| self.state.player(id))
    }

    pub fn payload_int(&self, key: &str) -> Option<i64> {
        self.event.and_then(|e| e.payload.int(key))
    }

    /// Missing flags read as false.
    pub fn payload_flag(&self, key: &str) -> bool {
        self.event
            .and_then(|e| e.payload.flag(key))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn doc_parts() -> (GameState, Bindings) {
        let state = GameState::empty(Board::court(7, 5), 0);
        let bindings = Bindings::new()
            .with(names::OWNER, Team::Home)
            .with(names::SELF, PlayerId(3));
        (state, bindings)
    }

    #[test]
    fn nth_occurrence_matches_only_that_count() {
        let (state, bindings) = doc_parts();
        let event = RequestEvent::new(EventKind::DrawCards).for_team(Team::Home);
        let cond = Condition::NthOccurrenceThisTurn(2);
        for (occurrence, expected) in [(1, false), (2, true), (3, false)] {
            let doc = TriggerDocument::new(&state, &bindings).with_event(&event, occurrence);
            assert_eq!(cond.evaluate(&doc), expected, "occurrence {occurrence}");
        }
    }

    #[test]
    fn event_team_is_relative_to_owner() {
        let (state, bindings) = doc_parts();
        let event = RequestEvent::new(EventKind::Shoot).for_team(Team::Away);
        let doc = TriggerDocument::new(&state, &bindings).with_event(&event, 1);
        assert!(Condition::EventTeam(Relation::Opponent).evaluate(&doc));
        assert!(!Condition::EventTeam(Relation::Own).evaluate(&doc));
    }

    #[test]
    fn strong_success_reads_payload_flag() {
        let (state, bindings) = doc_parts();
        let strong = RequestEvent::new(EventKind::SkillTestResolved).with(keys::STRONG, true);
        let weak = RequestEvent::new(EventKind::SkillTestResolved).with(keys::STRONG, false);
        let doc = TriggerDocument::new(&state, &bindings);
        assert!(Condition::StrongSuccess.evaluate(&doc.with_event(&strong, 1)));
        assert!(!Condition::StrongSuccess.evaluate(&doc.with_event(&weak, 1)));
        assert!(!Condition::StrongSuccess.evaluate(&doc));
    }

    #[test]
    fn combinators_compose() {
        let (state, bindings) = doc_parts();
        let doc = TriggerDocument::new(&state, &bindings);
        let cond = Condition::All(vec![
            Condition::PhaseIs(Phase::Setup),
            Condition::Not(Box::new(Condition::SelfHoldsBall)),
        ]);
        assert!(cond.evaluate(&doc));
        assert!(Condition::Any(vec![Condition::SelfOnCourt, Condition::Always]).evaluate(&doc));
    }
}
