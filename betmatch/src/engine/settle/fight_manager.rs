//! Fight Management Module
//!
//! This module provides functionality for managing fights and their wager
//! books. It handles fight lifecycle operations including creation, closing
//! of betting, settlement marking, and cancellation.

use crate::engine::data::WagerBook;
use crate::engine::entry::{Fight, FightStatus};
use crate::engine::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manager for fights and their associated wager books
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FightManager {
    /// Map of fight ids to their configurations
    fights: HashMap<String, Fight>,
    /// Map of fight ids to their wager books
    books: HashMap<String, WagerBook>,
}

#[allow(unused)]
impl FightManager {
    pub fn new() -> Self {
        Self {
            fights: HashMap::new(),
            books: HashMap::new(),
        }
    }

    pub fn add_fight(&mut self, fight: Fight) -> Result<(), EngineError> {
        if self.fights.contains_key(&fight.id) {
            return Err(EngineError::DuplicateFight(fight.id));
        }
        self.books
            .insert(fight.id.clone(), WagerBook::new(fight.id.clone()));
        self.fights.insert(fight.id.clone(), fight);
        Ok(())
    }

    pub fn get_fight(&self, id: &str) -> Option<&Fight> {
        self.fights.get(id)
    }

    pub fn get_book(&self, id: &str) -> Option<&WagerBook> {
        self.books.get(id)
    }

    pub fn get_fight_and_book(&mut self, id: &str) -> Option<(&Fight, &mut WagerBook)> {
        let fight = self.fights.get(id)?;
        let book = self.books.get_mut(id)?;
        Some((fight, book))
    }

    pub fn list_fights(&self) -> Vec<&Fight> {
        self.fights.values().collect()
    }

    pub fn set_status(&mut self, id: &str, status: FightStatus) -> Result<(), EngineError> {
        let fight = self
            .fights
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownFight(id.to_string()))?;
        fight.set_status(status);
        Ok(())
    }
}
