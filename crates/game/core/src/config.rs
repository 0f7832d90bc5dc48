/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Cards drawn by each team when the game starts.
    pub hand_size: u32,
    /// Cards drawn by the active team at the start of each of its turns.
    pub upkeep_draw: u32,
    /// Turns played before the quarter advances.
    pub turns_per_quarter: u32,
    /// Quarters played before the game is over.
    pub quarters: u8,
    /// Minimum hex distance to the hoop for a made shot to score three points.
    pub three_point_distance: u32,
    /// Court width in tiles (columns per row).
    pub court_width: i32,
    /// Court height in tiles (rows).
    pub court_height: i32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Maximum nesting of request events within one root action.
    ///
    /// Exceeding it aborts the action with a recursion-limit fault.
    pub const MAX_TRIGGER_DEPTH: usize = 12;
    /// Skill-test difficulty is `BASE_DIFFICULTY - effective stat`.
    pub const BASE_DIFFICULTY: i32 = 8;
    /// Margin at or above which a success counts as strong.
    pub const STRONG_SUCCESS_MARGIN: i32 = 2;
    /// Hex radius of a player's zone of control.
    pub const ZOC_RADIUS: u32 = 1;
    /// Largest number of fate cards a single skill test can reveal.
    pub const MAX_FATE_REVEAL: usize = 3;
    /// Maximum number of cards a single draw request may ask for.
    pub const MAX_DRAW: u32 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HAND_SIZE: u32 = 5;
    pub const DEFAULT_UPKEEP_DRAW: u32 = 1;
    pub const DEFAULT_TURNS_PER_QUARTER: u32 = 8;
    pub const DEFAULT_QUARTERS: u8 = 4;
    pub const DEFAULT_THREE_POINT_DISTANCE: u32 = 4;
    pub const DEFAULT_COURT_WIDTH: i32 = 13;
    pub const DEFAULT_COURT_HEIGHT: i32 = 7;

    pub fn new() -> Self {
        Self {
            hand_size: Self::DEFAULT_HAND_SIZE,
            upkeep_draw: Self::DEFAULT_UPKEEP_DRAW,
            turns_per_quarter: Self::DEFAULT_TURNS_PER_QUARTER,
            quarters: Self::DEFAULT_QUARTERS,
            three_point_distance: Self::DEFAULT_THREE_POINT_DISTANCE,
            court_width: Self::DEFAULT_COURT_WIDTH,
            court_height: Self::DEFAULT_COURT_HEIGHT,
        }
    }

    pub fn with_hand_size(mut self, hand_size: u32) -> Self {
        self.hand_size = hand_size;
        self
    }

    pub fn with_turns_per_quarter(mut self, turns: u32) -> Self {
        self.turns_per_quarter = turns;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
