//! Fight Types and Structures
//!
//! A fight is the two-sided contest wagers are placed on. It carries the
//! wager-amount limits enforced at placement time and the lifecycle status
//! that gates placement, closing and settlement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Lifecycle of a fight from the matcher's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FightStatus {
    /// Accepting new wagers
    #[default]
    Open,
    /// Betting closed, awaiting settlement
    Closed,
    /// Matching pass completed, outcome produced
    Settled,
    /// Fight called off, every wager refunded in full
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Fight {
    pub id: String,
    pub status: FightStatus,
    /// Minimum accepted wager amount
    pub min_wager: Decimal,
    /// Maximum accepted wager amount
    pub max_wager: Decimal,
    pub created_at: u64,
    pub updated_at: u64,
}

#[allow(unused)]
impl Fight {
    pub fn new(id: String, min_wager: Decimal, max_wager: Decimal) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Self {
            id,
            status: FightStatus::Open,
            min_wager,
            max_wager,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a fight with the limits from the runtime config.
    pub fn with_default_limits(id: String) -> Self {
        let (min_wager, max_wager) = {
            let config = crate::config::instance().lock().unwrap();
            (config.default_min_wager, config.default_max_wager)
        };
        Self::new(id, min_wager, max_wager)
    }

    pub fn validate_amount(&self, amount: Decimal) -> bool {
        amount >= self.min_wager && amount <= self.max_wager
    }

    pub fn is_open(&self) -> bool {
        self.status == FightStatus::Open
    }

    pub fn set_status(&mut self, status: FightStatus) {
        self.status = status;
        self.updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
    }
}
