use crate::engine::entry::{Side, Wager, WagerStatus};
use crate::engine::error::EngineError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All wagers placed on one fight, keyed by wager id.
///
/// Flat id-keyed records rather than a reference graph; the matcher only
/// needs id lookups and amount accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WagerBook {
    pub fight_id: String,
    wagers_by_id: HashMap<String, Wager>,
}

#[allow(unused)]
impl WagerBook {
    pub fn new(fight_id: String) -> Self {
        Self {
            fight_id,
            wagers_by_id: HashMap::new(),
        }
    }

    pub fn add_wager(&mut self, wager: Wager) -> Result<(), EngineError> {
        if self.wagers_by_id.contains_key(&wager.id) {
            return Err(EngineError::DuplicateWager(wager.id));
        }
        self.wagers_by_id.insert(wager.id.clone(), wager);
        Ok(())
    }

    pub fn remove_wager(&mut self, wager_id: &str) -> Option<Wager> {
        self.wagers_by_id.remove(wager_id)
    }

    pub fn get_wager(&self, wager_id: &str) -> Option<&Wager> {
        self.wagers_by_id.get(wager_id)
    }

    /// Snapshot of the open wagers, id-sorted so the matcher sees a stable
    /// input regardless of map iteration order.
    pub fn open_wagers(&self) -> Vec<Wager> {
        let mut wagers: Vec<Wager> = self
            .wagers_by_id
            .values()
            .filter(|w| w.status == WagerStatus::Open)
            .cloned()
            .collect();
        wagers.sort_by(|a, b| a.id.cmp(&b.id));
        wagers
    }

    pub fn side_total(&self, side: Side) -> Decimal {
        self.wagers_by_id
            .values()
            .filter(|w| w.side == side && w.status == WagerStatus::Open)
            .map(|w| w.amount)
            .sum()
    }

    /// Commits matched volume against a wager and refreshes its status.
    pub fn record_match(&mut self, wager_id: &str, amount: Decimal) -> Result<(), EngineError> {
        let wager = self
            .wagers_by_id
            .get_mut(wager_id)
            .ok_or_else(|| EngineError::UnknownWager(wager_id.to_string()))?;
        wager.matched_amount += amount;
        wager.update_status();
        Ok(())
    }

    pub fn set_status(&mut self, wager_id: &str, status: WagerStatus) -> Result<(), EngineError> {
        let wager = self
            .wagers_by_id
            .get_mut(wager_id)
            .ok_or_else(|| EngineError::UnknownWager(wager_id.to_string()))?;
        wager.set_status(status);
        Ok(())
    }

    pub fn wagers(&self) -> impl Iterator<Item = &Wager> {
        self.wagers_by_id.values()
    }

    pub fn len(&self) -> usize {
        self.wagers_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wagers_by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wager(id: &str, side: Side, amount: Decimal) -> Wager {
        Wager::new(
            id.to_string(),
            "f1".to_string(),
            side,
            amount,
            "u1".to_string(),
        )
    }

    #[test]
    fn test_add_and_remove() {
        let mut book = WagerBook::new("f1".to_string());
        book.add_wager(wager("w1", Side::Red, dec!(100))).unwrap();
        assert_eq!(book.len(), 1);

        let err = book.add_wager(wager("w1", Side::Green, dec!(50))).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateWager(id) if id == "w1"));

        let removed = book.remove_wager("w1").unwrap();
        assert_eq!(removed.id, "w1");
        assert!(book.is_empty());
        assert!(book.remove_wager("w1").is_none());
    }

    #[test]
    fn test_side_totals_ignore_settled_wagers() {
        let mut book = WagerBook::new("f1".to_string());
        book.add_wager(wager("w1", Side::Red, dec!(100))).unwrap();
        book.add_wager(wager("w2", Side::Red, dec!(250))).unwrap();
        book.add_wager(wager("w3", Side::Green, dec!(75))).unwrap();
        assert_eq!(book.side_total(Side::Red), dec!(350));
        assert_eq!(book.side_total(Side::Green), dec!(75));

        book.set_status("w2", WagerStatus::Refunded).unwrap();
        assert_eq!(book.side_total(Side::Red), dec!(100));
    }

    #[test]
    fn test_open_wagers_are_id_sorted() {
        let mut book = WagerBook::new("f1".to_string());
        book.add_wager(wager("wc", Side::Red, dec!(10))).unwrap();
        book.add_wager(wager("wa", Side::Green, dec!(20))).unwrap();
        book.add_wager(wager("wb", Side::Red, dec!(30))).unwrap();

        let ids: Vec<String> = book.open_wagers().into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["wa", "wb", "wc"]);
    }

    #[test]
    fn test_record_match_updates_status() {
        let mut book = WagerBook::new("f1".to_string());
        book.add_wager(wager("w1", Side::Red, dec!(100))).unwrap();

        book.record_match("w1", dec!(30)).unwrap();
        assert_eq!(book.get_wager("w1").unwrap().status, WagerStatus::PartiallyMatched);

        book.record_match("w1", dec!(70)).unwrap();
        assert_eq!(book.get_wager("w1").unwrap().status, WagerStatus::Matched);

        assert!(book.record_match("nope", dec!(1)).is_err());
    }
}
