//! Game rules built on top of the state model.
//!
//! Pure functions over `&GameState`: stat arithmetic, skill-test
//! resolution and zone-of-control movement costs. Nothing here mutates.
pub mod skill;
pub mod stats;
pub mod zoc;

pub use skill::{Selection, SkillTestResult};
pub use stats::{BonusStack, effective_stat};
