//! Betting Engine Module
//!
//! This module contains the core components of the bet-matching system:
//! - `data`: Data structures and types used throughout the engine
//! - `entry`: Wager, fight and match record definitions
//! - `error`: Engine error types
//! - `matchengine`: Top-level engine facade
//! - `matchlogic`: Core wager matching logic
//! - `settle`: Wager intake and fight settlement processing

pub mod data;
pub mod entry;
pub mod error;
pub mod matchengine;
pub mod matchlogic;
pub mod settle;
