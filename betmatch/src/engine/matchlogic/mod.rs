//! Match Logic Module
//!
//! This module implements the core wager matching logic for the betting
//! engine. It pairs opposing red and green wagers on a single fight with a
//! three-pass greedy algorithm (perfect matches first, then each side
//! anchored in turn) and computes the residual amount per wager.

pub mod matcher;

pub use matcher::Matcher;
