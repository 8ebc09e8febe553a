//! Data Structures Module
//!
//! This module contains the core data structures used throughout the betting
//! engine. Currently includes the wager book holding every wager placed on a
//! single fight.

pub mod book;

pub use book::WagerBook;
