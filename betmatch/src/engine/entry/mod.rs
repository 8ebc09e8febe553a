pub mod fight;
pub mod matched;
pub mod wager;

pub use fight::{Fight, FightStatus};
pub use matched::{MatchRecord, SettlementOutcome};
pub use wager::{Side, Wager, WagerStatus};
