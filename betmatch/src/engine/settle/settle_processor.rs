//! Settlement Processing Module
//!
//! This module drives the wager lifecycle for every fight: placement while
//! betting is open, cancellation, closing the book, and the settlement pass
//! that matches opposing wagers and computes refunds. Persisting the
//! resulting matches and crediting refunds is the caller's job; nothing in
//! here performs I/O.

use crate::engine::entry::{
    Fight, FightStatus, SettlementOutcome, Wager, WagerStatus,
};
use crate::engine::error::EngineError;
use crate::engine::matchlogic::Matcher;
use crate::engine::settle::FightManager;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Processor for wager intake and fight settlement
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettleProcessor {
    fight_manager: FightManager,
}

#[allow(unused)]
impl SettleProcessor {
    pub fn new() -> Self {
        Self {
            fight_manager: FightManager::new(),
        }
    }

    pub fn add_fight(&mut self, fight: Fight) -> Result<(), EngineError> {
        self.fight_manager.add_fight(fight)
    }

    pub fn get_fight(&self, fight_id: &str) -> Option<&Fight> {
        self.fight_manager.get_fight(fight_id)
    }

    pub fn get_book(&self, fight_id: &str) -> Option<&crate::engine::data::WagerBook> {
        self.fight_manager.get_book(fight_id)
    }

    pub fn list_fights(&self) -> Vec<&Fight> {
        self.fight_manager.list_fights()
    }

    /// Accepts a wager into its fight's book.
    ///
    /// The fight must exist and be open, and the amount must be positive
    /// and within the fight's limits.
    pub fn place_wager(&mut self, wager: &Wager) -> Result<(), EngineError> {
        let (fight, book) = self
            .fight_manager
            .get_fight_and_book(&wager.fight_id)
            .ok_or_else(|| EngineError::UnknownFight(wager.fight_id.clone()))?;

        if fight.status != FightStatus::Open {
            return Err(EngineError::FightNotOpen {
                id: fight.id.clone(),
                status: fight.status,
            });
        }
        if wager.amount <= Decimal::ZERO {
            return Err(EngineError::InvalidWager {
                id: wager.id.clone(),
                reason: format!("non-positive amount {}", wager.amount),
            });
        }
        if !fight.validate_amount(wager.amount) {
            return Err(EngineError::WagerOutsideLimits {
                id: wager.id.clone(),
                amount: wager.amount,
                min: fight.min_wager,
                max: fight.max_wager,
            });
        }
        book.add_wager(wager.clone())
    }

    /// Removes a wager while betting is still open and returns it so the
    /// caller can refund the stake.
    pub fn cancel_wager(&mut self, fight_id: &str, wager_id: &str) -> Result<Wager, EngineError> {
        let (fight, book) = self
            .fight_manager
            .get_fight_and_book(fight_id)
            .ok_or_else(|| EngineError::UnknownFight(fight_id.to_string()))?;

        if fight.status != FightStatus::Open {
            return Err(EngineError::FightNotOpen {
                id: fight.id.clone(),
                status: fight.status,
            });
        }
        book.remove_wager(wager_id)
            .ok_or_else(|| EngineError::UnknownWager(wager_id.to_string()))
    }

    /// Closes the book; no further wagers are accepted.
    pub fn close_betting(&mut self, fight_id: &str) -> Result<(), EngineError> {
        let fight = self
            .fight_manager
            .get_fight(fight_id)
            .ok_or_else(|| EngineError::UnknownFight(fight_id.to_string()))?;
        if fight.status != FightStatus::Open {
            return Err(EngineError::FightNotOpen {
                id: fight.id.clone(),
                status: fight.status,
            });
        }
        self.fight_manager.set_status(fight_id, FightStatus::Closed)
    }

    /// Runs the matching pass over a closed fight's book.
    ///
    /// Wager statuses are updated from the outcome (fully matched,
    /// partially matched, or refunded) and the fight is marked settled. A
    /// settled fight cannot be settled again, which keeps each wager pool
    /// subject to at most one matching pass.
    pub fn settle_fight(&mut self, fight_id: &str) -> Result<SettlementOutcome, EngineError> {
        let outcome = {
            let (fight, book) = self
                .fight_manager
                .get_fight_and_book(fight_id)
                .ok_or_else(|| EngineError::UnknownFight(fight_id.to_string()))?;

            if fight.status != FightStatus::Closed {
                return Err(EngineError::FightNotClosed {
                    id: fight.id.clone(),
                    status: fight.status,
                });
            }

            let wagers = book.open_wagers();
            let outcome = Matcher::new(fight_id.to_string()).run(&wagers)?;

            for matched in &outcome.matches {
                book.record_match(&matched.red_wager_id, matched.amount)?;
                book.record_match(&matched.green_wager_id, matched.amount)?;
            }
            for wager in &wagers {
                if outcome.matched_for(&wager.id) == Decimal::ZERO {
                    book.set_status(&wager.id, WagerStatus::Refunded)?;
                }
            }
            outcome
        };

        self.fight_manager.set_status(fight_id, FightStatus::Settled)?;
        log::info!(
            "settled fight {}: {} matches, {} residuals",
            fight_id,
            outcome.matches.len(),
            outcome.residuals.len()
        );
        Ok(outcome)
    }

    /// Calls a fight off. Every open wager becomes fully residual and no
    /// matches are produced.
    pub fn cancel_fight(&mut self, fight_id: &str) -> Result<SettlementOutcome, EngineError> {
        let outcome = {
            let (fight, book) = self
                .fight_manager
                .get_fight_and_book(fight_id)
                .ok_or_else(|| EngineError::UnknownFight(fight_id.to_string()))?;

            if !matches!(fight.status, FightStatus::Open | FightStatus::Closed) {
                return Err(EngineError::FightNotCancelable {
                    id: fight.id.clone(),
                    status: fight.status,
                });
            }

            let mut residuals = BTreeMap::new();
            for wager in book.open_wagers() {
                residuals.insert(wager.id.clone(), wager.remaining_amount());
                book.set_status(&wager.id, WagerStatus::Refunded)?;
            }
            SettlementOutcome {
                fight_id: fight_id.to_string(),
                matches: Vec::new(),
                residuals,
            }
        };

        self.fight_manager.set_status(fight_id, FightStatus::Canceled)?;
        log::info!(
            "canceled fight {}: {} wagers refunded in full",
            fight_id,
            outcome.residuals.len()
        );
        Ok(outcome)
    }
}
