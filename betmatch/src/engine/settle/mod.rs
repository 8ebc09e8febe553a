//! Settlement Module
//!
//! This module provides the lifecycle layers around the matcher:
//! - `fight_manager`: Manages fights and their wager books
//! - `settle_processor`: Takes wagers in, closes betting, and runs the
//!   matching pass that produces the settlement outcome
//!
//! Together these components handle everything between a wager being placed
//! and its fight being settled or called off.

pub mod fight_manager;
pub mod settle_processor;

pub use fight_manager::FightManager;
pub use settle_processor::SettleProcessor;
