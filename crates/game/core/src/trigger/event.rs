//! Request events: the logical occurrences triggers listen to.

use bitflags::bitflags;

use crate::state::{Payload, PlayerId, Team, Value};

/// Type tag of a request event.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    GameStart,
    TurnStart,
    TurnEnd,
    DrawCards,
    DiscardCard,
    MovePlayer,
    PickUpBall,
    Pass,
    Shoot,
    SkillTestStarted,
    SkillTestResolved,
    Score,
    PlayCard,
    Substitute,
    ExhaustPlayer,
}

bitflags! {
    /// Set of event kinds a trigger listens for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct EventMask: u32 {
        const GAME_START = 1 << 0;
        const TURN_START = 1 << 1;
        const TURN_END = 1 << 2;
        const DRAW_CARDS = 1 << 3;
        const DISCARD_CARD = 1 << 4;
        const MOVE_PLAYER = 1 << 5;
        const PICK_UP_BALL = 1 << 6;
        const PASS = 1 << 7;
        const SHOOT = 1 << 8;
        const SKILL_TEST_STARTED = 1 << 9;
        const SKILL_TEST_RESOLVED = 1 << 10;
        const SCORE = 1 << 11;
        const PLAY_CARD = 1 << 12;
        const SUBSTITUTE = 1 << 13;
        const EXHAUST_PLAYER = 1 << 14;
    }
}

impl EventKind {
    pub const fn mask(self) -> EventMask {
        match self {
            EventKind::GameStart => EventMask::GAME_START,
            EventKind::TurnStart => EventMask::TURN_START,
            EventKind::TurnEnd => EventMask::TURN_END,
            EventKind::DrawCards => EventMask::DRAW_CARDS,
            EventKind::DiscardCard => EventMask::DISCARD_CARD,
            EventKind::MovePlayer => EventMask::MOVE_PLAYER,
            EventKind::PickUpBall => EventMask::PICK_UP_BALL,
            EventKind::Pass => EventMask::PASS,
            EventKind::Shoot => EventMask::SHOOT,
            EventKind::SkillTestStarted => EventMask::SKILL_TEST_STARTED,
            EventKind::SkillTestResolved => EventMask::SKILL_TEST_RESOLVED,
            EventKind::Score => EventMask::SCORE,
            EventKind::PlayCard => EventMask::PLAY_CARD,
            EventKind::Substitute => EventMask::SUBSTITUTE,
            EventKind::ExhaustPlayer => EventMask::EXHAUST_PLAYER,
        }
    }

    /// Wire-style name, e.g. `draw-cards.request`.
    pub fn request_name(self) -> String {
        let tag: &'static str = self.into();
        format!("{tag}.request")
    }
}

impl EventMask {
    pub fn of(kinds: &[EventKind]) -> Self {
        kinds
            .iter()
            .fold(EventMask::empty(), |mask, kind| mask | kind.mask())
    }

    pub fn listens_to(self, kind: EventKind) -> bool {
        self.contains(kind.mask())
    }
}

impl From<EventKind> for EventMask {
    fn from(kind: EventKind) -> Self {
        kind.mask()
    }
}

/// Well-known payload keys.
pub mod keys {
    pub const COUNT: &str = "count";
    pub const TO: &str = "to";
    pub const FROM: &str = "from";
    pub const CARD: &str = "card";
    pub const TARGET: &str = "target";
    pub const RECEIVER: &str = "receiver";
    pub const INCOMING: &str = "incoming";
    /// Whether the default rule exhausts the mover.
    pub const EXHAUSTS: &str = "exhausts";
    pub const POINTS: &str = "points";
    pub const DISTANCE: &str = "distance";
    pub const SUCCESS: &str = "success";
    pub const MARGIN: &str = "margin";
    pub const STRONG: &str = "strong";
    pub const SELECTED: &str = "selected";
    pub const DIFFICULTY: &str = "difficulty";
    /// `"shot"`, `"pass"` or `"generic"`.
    pub const TEST_KIND: &str = "test-kind";
    pub const ADVANTAGE: &str = "advantage";
}

/// A logical occurrence broadcast to the trigger engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestEvent {
    pub kind: EventKind,
    pub team: Option<Team>,
    pub player: Option<PlayerId>,
    pub payload: Payload,
}

impl RequestEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            team: None,
            player: None,
            payload: Payload::new(),
        }
    }

    #[must_use]
    pub fn for_team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    #[must_use]
    pub fn by_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key, value);
        self
    }
}
