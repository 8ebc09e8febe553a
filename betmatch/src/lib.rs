//! Peer-to-peer bet matching for two-sided fights.
//!
//! Wagers on the red and green side of a fight are paired by a greedy
//! three-pass matcher that maximizes matched volume and reports the
//! unmatched residual per wager, with an exact money-conservation check on
//! every pass. The engine layers around the matcher track fight lifecycle
//! (open, closed, settled, canceled) and wager statuses; persisting matches
//! and paying refunds stays with the caller.

pub mod config;
pub mod engine;

pub use engine::entry::{
    Fight, FightStatus, MatchRecord, SettlementOutcome, Side, Wager, WagerStatus,
};
pub use engine::error::EngineError;
pub use engine::matchengine::{BetCmd, BetCmdType, BetEngine};
pub use engine::matchlogic::Matcher;
pub use engine::settle::SettleProcessor;
