//! Match Record Types and Structures
//!
//! A match record commits a specific amount from one red wager against one
//! green wager. The settlement outcome bundles the ordered match sequence
//! with the residual (refund) amount per wager.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// A pairing of opposing wagers produced by one matching pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier for the match
    pub id: String,
    /// Fight the matched wagers belong to
    pub fight_id: String,
    /// ID of the red-side wager
    pub red_wager_id: String,
    /// ID of the green-side wager
    pub green_wager_id: String,
    /// Volume committed by both wagers into this pairing
    pub amount: Decimal,
    /// Timestamp when the match was produced
    pub created_at: u64,
}

impl MatchRecord {
    pub fn new(
        id: String,
        fight_id: String,
        red_wager_id: String,
        green_wager_id: String,
        amount: Decimal,
    ) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Self {
            id,
            fight_id,
            red_wager_id,
            green_wager_id,
            amount,
            created_at: now,
        }
    }
}

/// Result of one matching pass over a fight's wager pool
///
/// The caller persists the matches and issues the refunds; nothing in here
/// has been written anywhere yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub fight_id: String,
    /// Matches in the order the algorithm produced them
    pub matches: Vec<MatchRecord>,
    /// Wager id -> unmatched amount owed back to the owner; only
    /// entries greater than zero are present
    pub residuals: BTreeMap<String, Decimal>,
}

#[allow(unused)]
impl SettlementOutcome {
    pub fn matched_total(&self) -> Decimal {
        self.matches.iter().map(|m| m.amount).sum()
    }

    pub fn residual_total(&self) -> Decimal {
        self.residuals.values().copied().sum()
    }

    /// Total volume a single wager committed across all its matches.
    pub fn matched_for(&self, wager_id: &str) -> Decimal {
        self.matches
            .iter()
            .filter(|m| m.red_wager_id == wager_id || m.green_wager_id == wager_id)
            .map(|m| m.amount)
            .sum()
    }
}
