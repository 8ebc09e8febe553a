//! Bet Engine Module
//!
//! This module implements the top-level engine facade. It exposes typed
//! methods for direct library use and a serialized command seam
//! (`apply`/`snapshot`) so a caller's replication or transaction layer can
//! drive the engine from an ordered command log and checkpoint its state.

pub use super::entry::{Fight, SettlementOutcome, Wager};
pub use super::settle::SettleProcessor;

use crate::engine::error::EngineError;
use serde::{Deserialize, Serialize};

/// Commands the engine accepts through the serialized seam
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub enum BetCmdType {
    /// Accept a new wager into its fight's book
    #[default]
    PlaceWager,
    /// Remove a wager while betting is still open
    CancelWager,
    /// Create a new fight
    CreateFight,
    /// Stop accepting wagers for a fight
    CloseBetting,
    /// Run the matching pass over a closed fight
    SettleFight,
    /// Call a fight off, refunding every wager in full
    CancelFight,
}

/// Command envelope for the serialized seam
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BetCmd {
    pub cmd: BetCmdType,
    /// Wager payload for wager-related commands
    pub wager: Option<Wager>,
    /// Fight payload for fight-related commands
    pub fight: Option<Fight>,
}

/// The betting engine
///
/// One engine instance is single-threaded; run one instance per worker and
/// give each fight to exactly one instance, and no two matching passes can
/// ever race over the same wager pool.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BetEngine {
    /// Index of the last applied command
    index: u64,
    processor: SettleProcessor,
}

#[allow(unused)]
impl BetEngine {
    pub fn new() -> BetEngine {
        BetEngine {
            index: 0,
            processor: SettleProcessor::new(),
        }
    }

    /// Applies one serialized command from the caller's ordered log.
    ///
    /// Settlement and fight cancellation return the outcome the caller must
    /// persist; every other command returns `None`. A failed command leaves
    /// the engine state untouched and must not be persisted.
    pub fn apply(
        &mut self,
        index: u64,
        data: &[u8],
    ) -> Result<Option<SettlementOutcome>, EngineError> {
        log::debug!("apply: index {} len {}", index, data.len());
        let cmd: BetCmd =
            bincode::deserialize(data).map_err(|e| EngineError::Decode(e.to_string()))?;
        let outcome = match cmd.cmd {
            BetCmdType::PlaceWager => {
                let wager = cmd.wager.ok_or_else(|| missing("wager"))?;
                self.place_wager(&wager)?;
                None
            }
            BetCmdType::CancelWager => {
                let wager = cmd.wager.ok_or_else(|| missing("wager"))?;
                self.cancel_wager(&wager.fight_id, &wager.id)?;
                None
            }
            BetCmdType::CreateFight => {
                let fight = cmd.fight.ok_or_else(|| missing("fight"))?;
                self.create_fight(fight)?;
                None
            }
            BetCmdType::CloseBetting => {
                let fight = cmd.fight.ok_or_else(|| missing("fight"))?;
                self.close_betting(&fight.id)?;
                None
            }
            BetCmdType::SettleFight => {
                let fight = cmd.fight.ok_or_else(|| missing("fight"))?;
                Some(self.settle_fight(&fight.id)?)
            }
            BetCmdType::CancelFight => {
                let fight = cmd.fight.ok_or_else(|| missing("fight"))?;
                Some(self.cancel_fight(&fight.id)?)
            }
        };
        self.index = index;
        Ok(outcome)
    }

    pub fn create_fight(&mut self, fight: Fight) -> Result<(), EngineError> {
        self.processor.add_fight(fight)
    }

    /// Creates a fight with the wager limits from the runtime config.
    pub fn open_fight(&mut self, fight_id: &str) -> Result<(), EngineError> {
        self.processor
            .add_fight(Fight::with_default_limits(fight_id.to_string()))
    }

    pub fn place_wager(&mut self, wager: &Wager) -> Result<(), EngineError> {
        self.processor.place_wager(wager)
    }

    pub fn cancel_wager(&mut self, fight_id: &str, wager_id: &str) -> Result<Wager, EngineError> {
        self.processor.cancel_wager(fight_id, wager_id)
    }

    pub fn close_betting(&mut self, fight_id: &str) -> Result<(), EngineError> {
        self.processor.close_betting(fight_id)
    }

    pub fn settle_fight(&mut self, fight_id: &str) -> Result<SettlementOutcome, EngineError> {
        self.processor.settle_fight(fight_id)
    }

    pub fn cancel_fight(&mut self, fight_id: &str) -> Result<SettlementOutcome, EngineError> {
        self.processor.cancel_fight(fight_id)
    }

    pub fn list_fights(&self) -> Vec<&Fight> {
        self.processor.list_fights()
    }

    pub fn last_index(&self) -> u64 {
        self.index
    }

    /// Restores engine state from a snapshot.
    pub fn on_snapshot(&mut self, data: &[u8]) {
        match bincode::deserialize(data) {
            Ok(engine) => *self = engine,
            Err(e) => {
                log::error!("failed to deserialize bet engine: {}", e);
            }
        }
    }

    /// Creates a snapshot of the current engine state.
    pub fn snapshot(&self) -> Vec<u8> {
        bincode::serialize(&self).unwrap()
    }
}

fn missing(field: &str) -> EngineError {
    EngineError::Decode(format!("command is missing its {} payload", field))
}
