use crate::engine::entry::FightStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the betting engine
///
/// Every variant is terminal for the invocation that raised it; retrying
/// belongs to the caller's persistence layer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A wager in the batch is malformed; the whole batch is rejected.
    #[error("invalid wager {id}: {reason}")]
    InvalidWager { id: String, reason: String },

    #[error("unrecognized side {0:?}, expected \"red\" or \"green\"")]
    UnknownSide(String),

    /// Post-match conservation check failed. The caller must not persist
    /// any match or refund from this pass.
    #[error(
        "conservation check failed for fight {fight_id}: staked {staked}, \
         matched {matched}, residual {residual}"
    )]
    ConservationViolation {
        fight_id: String,
        staked: Decimal,
        matched: Decimal,
        residual: Decimal,
    },

    #[error("fight {0} does not exist")]
    UnknownFight(String),

    #[error("fight {0} already exists")]
    DuplicateFight(String),

    #[error("fight {id} is not accepting wagers (status {status:?})")]
    FightNotOpen { id: String, status: FightStatus },

    #[error("fight {id} is not closed for settlement (status {status:?})")]
    FightNotClosed { id: String, status: FightStatus },

    #[error("fight {id} can no longer be canceled (status {status:?})")]
    FightNotCancelable { id: String, status: FightStatus },

    #[error("wager {0} already exists")]
    DuplicateWager(String),

    #[error("wager {0} does not exist")]
    UnknownWager(String),

    #[error("wager {id} amount {amount} outside fight limits [{min}, {max}]")]
    WagerOutsideLimits {
        id: String,
        amount: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("failed to decode engine command: {0}")]
    Decode(String),
}
