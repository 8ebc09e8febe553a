use crate::engine::entry::{MatchRecord, SettlementOutcome, Side, Wager};
use crate::engine::error::EngineError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Pairs opposing wagers on one fight and computes per-wager residuals.
///
/// The matcher is pure: it works on local copies of the remaining amounts
/// and never mutates the input wagers. Identical input produces identical
/// pairings, amounts and residuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matcher {
    fight_id: String,
}

/// Working copy of one wager's unmatched stake.
#[derive(Debug, Clone)]
struct Entry {
    id: String,
    remaining: Decimal,
}

impl Matcher {
    pub fn new(fight_id: String) -> Self {
        Self { fight_id }
    }

    /// Runs one matching pass over the given wager pool.
    ///
    /// Three ordered passes, each consuming what the previous one left:
    /// 1. perfect matches (identical remaining amounts, both fully consumed)
    /// 2. each green wager greedily consumes red wagers, smallest first
    /// 3. the symmetric sweep for red wagers still carrying remainder
    ///
    /// Wagers already fully matched on entry are skipped. Afterwards any
    /// remaining amount becomes that wager's residual, and the whole result
    /// is verified against the conservation invariant before it is returned.
    pub fn run(&self, wagers: &[Wager]) -> Result<SettlementOutcome, EngineError> {
        self.validate(wagers)?;

        let staked: Decimal = wagers.iter().map(|w| w.remaining_amount()).sum();

        let mut red = self.entries(wagers, Side::Red);
        let mut green = self.entries(wagers, Side::Green);
        let mut matches = Vec::new();

        self.perfect_pass(&mut red, &mut green, &mut matches);
        self.anchor_pass(&mut red, &mut green, &mut matches, Side::Green);
        self.anchor_pass(&mut red, &mut green, &mut matches, Side::Red);

        let mut residuals = BTreeMap::new();
        for entry in red.iter().chain(green.iter()) {
            if entry.remaining > Decimal::ZERO {
                residuals.insert(entry.id.clone(), entry.remaining);
            }
        }

        let outcome = SettlementOutcome {
            fight_id: self.fight_id.clone(),
            matches,
            residuals,
        };

        let matched = outcome.matched_total();
        let residual = outcome.residual_total();
        if matched * Decimal::TWO + residual != staked {
            return Err(EngineError::ConservationViolation {
                fight_id: self.fight_id.clone(),
                staked,
                matched,
                residual,
            });
        }

        Ok(outcome)
    }

    /// Rejects the whole batch on the first malformed wager. A corrupt
    /// wager indicates an upstream data-integrity bug; partially matching
    /// around it would break conservation downstream.
    fn validate(&self, wagers: &[Wager]) -> Result<(), EngineError> {
        let mut seen = HashSet::new();
        for wager in wagers {
            if wager.fight_id != self.fight_id {
                return Err(EngineError::InvalidWager {
                    id: wager.id.clone(),
                    reason: format!(
                        "belongs to fight {}, matcher is bound to {}",
                        wager.fight_id, self.fight_id
                    ),
                });
            }
            if !seen.insert(wager.id.clone()) {
                return Err(EngineError::InvalidWager {
                    id: wager.id.clone(),
                    reason: "duplicate wager id in batch".to_string(),
                });
            }
            if wager.amount <= Decimal::ZERO {
                return Err(EngineError::InvalidWager {
                    id: wager.id.clone(),
                    reason: format!("non-positive amount {}", wager.amount),
                });
            }
            if wager.matched_amount < Decimal::ZERO {
                return Err(EngineError::InvalidWager {
                    id: wager.id.clone(),
                    reason: format!("negative matched amount {}", wager.matched_amount),
                });
            }
            if wager.matched_amount > wager.amount {
                return Err(EngineError::InvalidWager {
                    id: wager.id.clone(),
                    reason: format!(
                        "matched amount {} exceeds stake {}",
                        wager.matched_amount, wager.amount
                    ),
                });
            }
        }
        Ok(())
    }

    /// Working entries for one side, ascending by remaining amount with
    /// ties broken by id so reruns are reproducible. Fully matched wagers
    /// are skipped, not errors (incremental invocation).
    fn entries(&self, wagers: &[Wager], side: Side) -> Vec<Entry> {
        let mut entries: Vec<Entry> = wagers
            .iter()
            .filter(|w| w.side == side && w.remaining_amount() > Decimal::ZERO)
            .map(|w| Entry {
                id: w.id.clone(),
                remaining: w.remaining_amount(),
            })
            .collect();
        entries.sort_by(|a, b| a.remaining.cmp(&b.remaining).then(a.id.cmp(&b.id)));
        entries
    }

    /// Pairs wagers with identical remaining amounts, consuming both
    /// entirely. Running this before the greedy sweeps keeps exact
    /// pairings intact instead of fragmenting them.
    fn perfect_pass(
        &self,
        red: &mut [Entry],
        green: &mut [Entry],
        matches: &mut Vec<MatchRecord>,
    ) {
        for r in red.iter_mut() {
            if r.remaining.is_zero() {
                continue;
            }
            let twin = green
                .iter_mut()
                .find(|g| !g.remaining.is_zero() && g.remaining == r.remaining);
            if let Some(g) = twin {
                matches.push(self.record(&r.id, &g.id, r.remaining));
                r.remaining = Decimal::ZERO;
                g.remaining = Decimal::ZERO;
            }
        }
    }

    /// Greedy sweep with one side anchored: each anchor wager (ascending)
    /// consumes opposing wagers (ascending) by min(remaining, remaining),
    /// one match per pairing touched.
    fn anchor_pass(
        &self,
        red: &mut [Entry],
        green: &mut [Entry],
        matches: &mut Vec<MatchRecord>,
        anchor: Side,
    ) {
        let (anchors, pool) = match anchor {
            Side::Green => (green, red),
            Side::Red => (red, green),
        };
        for a in anchors.iter_mut() {
            if a.remaining.is_zero() {
                continue;
            }
            for p in pool.iter_mut() {
                if a.remaining.is_zero() {
                    break;
                }
                if p.remaining.is_zero() {
                    continue;
                }
                let amount = a.remaining.min(p.remaining);
                let (red_id, green_id) = match anchor {
                    Side::Green => (&p.id, &a.id),
                    Side::Red => (&a.id, &p.id),
                };
                matches.push(self.record(red_id, green_id, amount));
                a.remaining -= amount;
                p.remaining -= amount;
            }
        }
    }

    fn record(&self, red_id: &str, green_id: &str, amount: Decimal) -> MatchRecord {
        MatchRecord::new(
            Uuid::new_v4().to_string(),
            self.fight_id.clone(),
            red_id.to_string(),
            green_id.to_string(),
            amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rust_decimal_macros::dec;

    fn wager(id: &str, side: Side, amount: Decimal) -> Wager {
        Wager::new(
            id.to_string(),
            "f1".to_string(),
            side,
            amount,
            format!("owner-{}", id),
        )
    }

    fn pairings(outcome: &SettlementOutcome) -> Vec<(String, String, Decimal)> {
        outcome
            .matches
            .iter()
            .map(|m| (m.red_wager_id.clone(), m.green_wager_id.clone(), m.amount))
            .collect()
    }

    fn assert_conserved(wagers: &[Wager], outcome: &SettlementOutcome) {
        let staked: Decimal = wagers.iter().map(|w| w.remaining_amount()).sum();
        assert_eq!(
            outcome.matched_total() * dec!(2) + outcome.residual_total(),
            staked
        );
        for w in wagers {
            assert!(outcome.matched_for(&w.id) <= w.amount, "wager {} overconsumed", w.id);
        }
    }

    #[test]
    fn test_two_small_red_against_one_large_green() {
        let wagers = vec![
            wager("r1", Side::Red, dec!(100)),
            wager("r2", Side::Red, dec!(100)),
            wager("g1", Side::Green, dec!(500)),
        ];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        assert_eq!(
            pairings(&outcome),
            vec![
                ("r1".to_string(), "g1".to_string(), dec!(100)),
                ("r2".to_string(), "g1".to_string(), dec!(100)),
            ]
        );
        assert_eq!(outcome.residuals.len(), 1);
        assert_eq!(outcome.residuals["g1"], dec!(300));
        assert_conserved(&wagers, &outcome);
    }

    #[test]
    fn test_perfect_matches_leave_no_residual() {
        let wagers = vec![
            wager("r1", Side::Red, dec!(100)),
            wager("r2", Side::Red, dec!(200)),
            wager("r3", Side::Red, dec!(300)),
            wager("g1", Side::Green, dec!(100)),
            wager("g2", Side::Green, dec!(200)),
            wager("g3", Side::Green, dec!(300)),
        ];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        assert_eq!(
            pairings(&outcome),
            vec![
                ("r1".to_string(), "g1".to_string(), dec!(100)),
                ("r2".to_string(), "g2".to_string(), dec!(200)),
                ("r3".to_string(), "g3".to_string(), dec!(300)),
            ]
        );
        assert!(outcome.residuals.is_empty());
        assert_conserved(&wagers, &outcome);
    }

    #[test]
    fn test_one_sided_book_is_fully_residual() {
        let wagers = vec![
            wager("r1", Side::Red, dec!(100)),
            wager("r2", Side::Red, dec!(200)),
            wager("r3", Side::Red, dec!(300)),
        ];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.residuals["r1"], dec!(100));
        assert_eq!(outcome.residuals["r2"], dec!(200));
        assert_eq!(outcome.residuals["r3"], dec!(300));
        assert_conserved(&wagers, &outcome);
    }

    #[test]
    fn test_large_red_fragments_across_many_green() {
        let wagers = vec![
            wager("r1", Side::Red, dec!(1000)),
            wager("g1", Side::Green, dec!(100)),
            wager("g2", Side::Green, dec!(200)),
            wager("g3", Side::Green, dec!(300)),
            wager("g4", Side::Green, dec!(400)),
        ];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        assert_eq!(outcome.matches.len(), 4);
        assert_eq!(outcome.matched_total(), dec!(1000));
        assert!(outcome.matches.iter().all(|m| m.red_wager_id == "r1"));
        assert!(outcome.residuals.is_empty());
        assert_conserved(&wagers, &outcome);
    }

    #[test]
    fn test_disjoint_totals() {
        let wagers = vec![
            wager("r1", Side::Red, dec!(50)),
            wager("r2", Side::Red, dec!(75)),
            wager("g1", Side::Green, dec!(1000)),
        ];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        assert_eq!(
            pairings(&outcome),
            vec![
                ("r1".to_string(), "g1".to_string(), dec!(50)),
                ("r2".to_string(), "g1".to_string(), dec!(75)),
            ]
        );
        assert_eq!(outcome.matched_total(), dec!(125));
        assert_eq!(outcome.residuals["g1"], dec!(875));
        assert_eq!(outcome.residuals.len(), 1);
        assert_conserved(&wagers, &outcome);
    }

    #[test]
    fn test_empty_input() {
        let outcome = Matcher::new("f1".to_string()).run(&[]).unwrap();
        assert!(outcome.matches.is_empty());
        assert!(outcome.residuals.is_empty());
    }

    #[test]
    fn test_equal_amount_ties_break_by_id() {
        let wagers = vec![
            wager("rb", Side::Red, dec!(100)),
            wager("ra", Side::Red, dec!(100)),
            wager("g1", Side::Green, dec!(100)),
        ];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        assert_eq!(
            pairings(&outcome),
            vec![("ra".to_string(), "g1".to_string(), dec!(100))]
        );
        assert_eq!(outcome.residuals["rb"], dec!(100));
    }

    #[test]
    fn test_skips_fully_matched_wagers() {
        let mut consumed = wager("r0", Side::Red, dec!(100));
        consumed.matched_amount = dec!(100);
        let wagers = vec![
            consumed,
            wager("r1", Side::Red, dec!(100)),
            wager("g1", Side::Green, dec!(100)),
        ];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        assert_eq!(
            pairings(&outcome),
            vec![("r1".to_string(), "g1".to_string(), dec!(100))]
        );
        assert!(!outcome.residuals.contains_key("r0"));
    }

    #[test]
    fn test_partially_matched_wager_contributes_remainder() {
        let mut partial = wager("r1", Side::Red, dec!(100));
        partial.matched_amount = dec!(40);
        let wagers = vec![partial, wager("g1", Side::Green, dec!(60))];
        let outcome = Matcher::new("f1".to_string()).run(&wagers).unwrap();

        // remaining 60 pairs perfectly with the green 60
        assert_eq!(
            pairings(&outcome),
            vec![("r1".to_string(), "g1".to_string(), dec!(60))]
        );
        assert!(outcome.residuals.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let wagers = vec![wager("r1", Side::Red, dec!(0))];
        let err = Matcher::new("f1".to_string()).run(&wagers).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWager { id, .. } if id == "r1"));

        let wagers = vec![wager("r2", Side::Red, dec!(-5))];
        let err = Matcher::new("f1".to_string()).run(&wagers).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWager { id, .. } if id == "r2"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let wagers = vec![
            wager("r1", Side::Red, dec!(100)),
            wager("r1", Side::Red, dec!(200)),
        ];
        let err = Matcher::new("f1".to_string()).run(&wagers).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWager { id, .. } if id == "r1"));
    }

    #[test]
    fn test_rejects_wager_from_other_fight() {
        let mut stray = wager("r1", Side::Red, dec!(100));
        stray.fight_id = "f2".to_string();
        let err = Matcher::new("f1".to_string()).run(&[stray]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWager { id, .. } if id == "r1"));
    }

    #[test]
    fn test_no_state_carries_between_invocations() {
        // disjoint subsets of the same pool must never cross-match
        let matcher = Matcher::new("f1".to_string());
        let reds = vec![wager("r1", Side::Red, dec!(100))];
        let greens = vec![wager("g1", Side::Green, dec!(100))];

        let first = matcher.run(&reds).unwrap();
        let second = matcher.run(&greens).unwrap();

        assert!(first.matches.is_empty());
        assert!(second.matches.is_empty());
        assert_eq!(first.residuals["r1"], dec!(100));
        assert_eq!(second.residuals["g1"], dec!(100));
    }

    #[test]
    fn test_deterministic_across_runs() {
        let wagers = vec![
            wager("r1", Side::Red, dec!(120)),
            wager("r2", Side::Red, dec!(80)),
            wager("r3", Side::Red, dec!(80)),
            wager("g1", Side::Green, dec!(200)),
            wager("g2", Side::Green, dec!(45)),
        ];
        let matcher = Matcher::new("f1".to_string());
        let first = matcher.run(&wagers).unwrap();
        let second = matcher.run(&wagers).unwrap();

        assert_eq!(pairings(&first), pairings(&second));
        assert_eq!(first.residuals, second.residuals);
    }

    #[test]
    fn test_conservation_over_random_pools() {
        let mut rng = rand::thread_rng();
        let matcher = Matcher::new("f1".to_string());
        for _ in 0..200 {
            let count = rng.gen_range(0..40);
            let wagers: Vec<Wager> = (0..count)
                .map(|i| {
                    let side = if rng.gen_bool(0.5) { Side::Red } else { Side::Green };
                    wager(&format!("w{}", i), side, Decimal::from(rng.gen_range(1..=1000)))
                })
                .collect();
            let outcome = matcher.run(&wagers).unwrap();
            assert_conserved(&wagers, &outcome);
            assert!(outcome.matches.iter().all(|m| m.amount > dec!(0)));
        }
    }
}
