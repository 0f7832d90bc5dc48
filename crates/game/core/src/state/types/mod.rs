mod ball;
mod choice;
mod common;
mod deck;
mod player;
mod skill;
mod value;

pub use ball::{BallState, FlightKind};
pub use choice::{ChoiceOption, Continuation, PendingChoice};
pub use common::{CardRef, ChoiceId, InstanceId, Phase, PlayerId, Score, Team, Tick};
pub use deck::{CardInstance, Deck, Pile, PlayedCard, StackEntry, TeamState, Teams};
pub use player::{Bonus, Expiry, Player, Size, Stat, StatModifier, Stats};
pub use skill::{AdvantageLevel, AdvantageSource, PendingSkillTest, SkillTestKind};
pub use value::{Bindings, Payload, Value, names};
