use crate::engine::error::EngineError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// One of the two opposing outcomes of a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Side {
    #[default]
    Red,
    Green,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Red => Side::Green,
            Side::Green => Side::Red,
        }
    }
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Side::Red),
            "green" => Ok(Side::Green),
            other => Err(EngineError::UnknownSide(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Green => write!(f, "green"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WagerStatus {
    #[default]
    Open,
    PartiallyMatched,
    Matched,
    Refunded,
    Canceled,
}

/// A stake placed by one owner on one side of a fight
/// `amount` is the original stake and is never reduced; `matched_amount`
/// accumulates the volume committed into matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wager {
    pub id: String,
    pub fight_id: String,
    pub side: Side,
    pub amount: Decimal,
    pub matched_amount: Decimal,
    pub owner_id: String,
    pub status: WagerStatus,
    pub created_at: u64,
    pub updated_at: u64,
}

#[allow(unused)]
impl Wager {
    pub fn new(
        id: String,
        fight_id: String,
        side: Side,
        amount: Decimal,
        owner_id: String,
    ) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Self {
            id,
            fight_id,
            side,
            amount,
            matched_amount: dec!(0),
            owner_id,
            status: WagerStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stake not yet committed into any match.
    pub fn remaining_amount(&self) -> Decimal {
        self.amount - self.matched_amount
    }

    pub fn is_fully_matched(&self) -> bool {
        self.matched_amount >= self.amount
    }

    pub fn is_cancelable(&self) -> bool {
        matches!(self.status, WagerStatus::Open)
    }

    pub fn update_status(&mut self) {
        if self.is_fully_matched() {
            self.status = WagerStatus::Matched;
        } else if self.matched_amount > dec!(0) {
            self.status = WagerStatus::PartiallyMatched;
        }
        self.updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
    }

    pub fn set_status(&mut self, status: WagerStatus) {
        self.status = status;
        self.updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
    }
}
