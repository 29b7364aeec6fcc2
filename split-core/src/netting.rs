//! Pairwise debt netting
//!
//! Converts a snapshot of unarchived purchase records into the minimal set
//! of residual pairwise obligations and signed per-person totals.
//!
//! # Algorithm
//!
//! 1. Build the participant universe (roster ∪ buyers ∪ split members)
//! 2. Accumulate directed debt per record: every unpaid split member owes
//!    the buyer one equal share
//! 3. Cancel mutual debt per unordered pair down to a single direction
//! 4. Emit settlements above the tolerance and derive net totals from them
//!
//! # Example
//!
//! ```text
//! bee buys $100, split with elsa (both unpaid): elsa owes bee $50
//! elsa buys $60, split with bee (both unpaid):  bee owes elsa $30
//!
//! After netting: elsa owes bee $20
//! Totals: elsa +20, bee -20
//! ```
//!
//! Netting is pairwise only: mutual debt between two people cancels, but
//! transitive cycles (A→B→C→A) are deliberately left intact so observable
//! settlement amounts match the accumulated obligations.

use crate::{
    types::{Member, NetReport, Record, Settlement},
    Result,
};
use std::collections::{BTreeMap, BTreeSet};

/// Threshold below which an obligation or total counts as settled
///
/// Repeated equal-share division accumulates floating-point noise; residuals
/// and totals with magnitude under this value are treated as zero. Design
/// parameter, shared with the storage collaborator's configuration.
pub const SETTLEMENT_TOLERANCE: f64 = 0.01;

/// Debt netting engine
#[derive(Debug, Clone, Copy)]
pub struct NettingEngine {
    /// Settled/noise threshold (absolute value)
    tolerance: f64,
}

impl Default for NettingEngine {
    fn default() -> Self {
        Self {
            tolerance: SETTLEMENT_TOLERANCE,
        }
    }
}

impl NettingEngine {
    /// Create an engine with a custom tolerance
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Active tolerance threshold
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Compute outstanding settlements and net totals
    ///
    /// Only unarchived records with a non-empty split contribute. The report
    /// is bit-for-bit identical across invocations with the same inputs:
    /// participants and debts live in ordered maps, and settlements are
    /// emitted sorted by `(debtor, creditor)`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidRecord`] when any input record has a negative
    /// or non-finite amount or a malformed split list. Invalid input is
    /// surfaced, never coerced.
    pub fn net_debts(&self, records: &[Record], roster: &[Member]) -> Result<NetReport> {
        for record in records {
            record.validate()?;
        }

        // Participant universe: set union, order only matters for output
        // stability
        let mut participants: BTreeSet<Member> = roster.iter().cloned().collect();
        for record in records {
            participants.insert(record.buyer.clone());
            for member in &record.split_members {
                participants.insert(member.name.clone());
            }
        }

        // Raw bilateral accumulation: debts[(debtor, creditor)]
        let mut debts: BTreeMap<(Member, Member), f64> = BTreeMap::new();
        for record in records {
            if record.is_archived {
                continue;
            }
            // Empty split contributes nothing
            let share = match record.share_amount() {
                Some(share) => share,
                None => continue,
            };

            for member in &record.split_members {
                // The buyer never owes themself; paid shares are already
                // settled outside the net calculation
                if member.name == record.buyer || member.paid {
                    continue;
                }
                *debts
                    .entry((member.name.clone(), record.buyer.clone()))
                    .or_insert(0.0) += share;
            }
        }

        // Bilateral netting: each unordered pair considered exactly once,
        // the larger side survives with the difference
        let people: Vec<&Member> = participants.iter().collect();
        let mut settlements = Vec::new();

        for i in 0..people.len() {
            for j in (i + 1)..people.len() {
                let (a, b) = (people[i], people[j]);
                let a_owes_b = debts
                    .get(&(a.clone(), b.clone()))
                    .copied()
                    .unwrap_or(0.0);
                let b_owes_a = debts
                    .get(&(b.clone(), a.clone()))
                    .copied()
                    .unwrap_or(0.0);

                let residual = a_owes_b - b_owes_a;
                if residual > self.tolerance {
                    settlements.push(Settlement {
                        debtor: a.clone(),
                        creditor: b.clone(),
                        amount: residual,
                    });
                } else if -residual > self.tolerance {
                    settlements.push(Settlement {
                        debtor: b.clone(),
                        creditor: a.clone(),
                        amount: -residual,
                    });
                }
                // Equal within tolerance: both directions cancel
            }
        }

        settlements.sort_by(|x, y| {
            (&x.debtor, &x.creditor).cmp(&(&y.debtor, &y.creditor))
        });

        // Net totals derive from the netted settlements, not the raw debts
        let mut totals: BTreeMap<Member, f64> = BTreeMap::new();
        for settlement in &settlements {
            *totals.entry(settlement.debtor.clone()).or_insert(0.0) += settlement.amount;
            *totals.entry(settlement.creditor.clone()).or_insert(0.0) -= settlement.amount;
        }
        totals.retain(|_, total| total.abs() >= self.tolerance);

        tracing::debug!(
            participants = participants.len(),
            settlements = settlements.len(),
            "netting complete"
        );

        Ok(NetReport {
            settlements,
            totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecordId, SplitMember, WeekKey};

    fn record(id: i64, buyer: &str, amount: f64, split: &[(&str, bool)]) -> Record {
        Record {
            id: RecordId(id),
            week: WeekKey::new("2025-10-20 ~ 2025-10-27"),
            buyer: Member::new(buyer),
            description: "groceries".to_string(),
            amount,
            split_members: split
                .iter()
                .map(|(name, paid)| SplitMember {
                    name: Member::new(*name),
                    paid: *paid,
                })
                .collect(),
            is_archived: false,
        }
    }

    fn roster(names: &[&str]) -> Vec<Member> {
        names.iter().map(|n| Member::new(*n)).collect()
    }

    #[test]
    fn test_single_record_split_two_ways() {
        let engine = NettingEngine::default();
        let records = vec![record(1, "bee", 100.0, &[("bee", true), ("elsa", false)])];

        let report = engine.net_debts(&records, &roster(&["bee", "elsa"])).unwrap();

        assert_eq!(report.settlements.len(), 1);
        let s = &report.settlements[0];
        assert_eq!(s.debtor, Member::new("elsa"));
        assert_eq!(s.creditor, Member::new("bee"));
        assert!((s.amount - 50.0).abs() < 1e-9);

        assert!((report.totals[&Member::new("elsa")] - 50.0).abs() < 1e-9);
        assert!((report.totals[&Member::new("bee")] + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_mutual_debt_nets_to_single_direction() {
        let engine = NettingEngine::default();
        // elsa owes bee 50, bee owes elsa 30 → elsa owes bee 20
        let records = vec![
            record(1, "bee", 100.0, &[("bee", false), ("elsa", false)]),
            record(2, "elsa", 60.0, &[("elsa", false), ("bee", false)]),
        ];

        let report = engine.net_debts(&records, &roster(&["bee", "elsa"])).unwrap();

        assert_eq!(report.settlements.len(), 1);
        let s = &report.settlements[0];
        assert_eq!(s.debtor, Member::new("elsa"));
        assert_eq!(s.creditor, Member::new("bee"));
        assert!((s.amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_mutual_debt_cancels() {
        let engine = NettingEngine::default();
        let records = vec![
            record(1, "bee", 100.0, &[("bee", false), ("elsa", false)]),
            record(2, "elsa", 100.0, &[("elsa", false), ("bee", false)]),
        ];

        let report = engine.net_debts(&records, &roster(&["bee", "elsa"])).unwrap();
        assert!(report.settlements.is_empty());
        assert!(report.totals.is_empty());
    }

    #[test]
    fn test_buyer_never_owes_themself() {
        let engine = NettingEngine::default();
        // Buyer listed unpaid in their own split still owes nothing
        let records = vec![record(1, "bee", 90.0, &[("bee", false), ("elsa", false), ("jim", false)])];

        let report = engine
            .net_debts(&records, &roster(&["bee", "elsa", "jim"]))
            .unwrap();

        assert_eq!(report.settlements.len(), 2);
        for s in &report.settlements {
            assert_ne!(s.debtor, s.creditor);
            assert_ne!(s.debtor, Member::new("bee"));
            assert!((s.amount - 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_paid_shares_contribute_nothing() {
        let engine = NettingEngine::default();
        let records = vec![record(1, "bee", 100.0, &[("bee", true), ("elsa", true)])];

        let report = engine.net_debts(&records, &roster(&["bee", "elsa"])).unwrap();
        assert!(report.settlements.is_empty());
        assert!(report.totals.is_empty());
    }

    #[test]
    fn test_archived_records_are_excluded() {
        let engine = NettingEngine::default();
        let mut archived = record(1, "bee", 100.0, &[("elsa", false)]);
        archived.is_archived = true;
        let records = vec![archived, record(2, "bee", 40.0, &[("elsa", false)])];

        let report = engine.net_debts(&records, &roster(&["bee", "elsa"])).unwrap();
        assert_eq!(report.settlements.len(), 1);
        assert!((report.settlements[0].amount - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_split_contributes_nothing() {
        let engine = NettingEngine::default();
        let records = vec![record(1, "bee", 100.0, &[])];

        let report = engine.net_debts(&records, &roster(&["bee", "elsa"])).unwrap();
        assert!(report.settlements.is_empty());
    }

    #[test]
    fn test_participants_outside_roster_are_included() {
        let engine = NettingEngine::default();
        // Neither guest nor host is on the roster
        let records = vec![record(1, "host", 30.0, &[("guest", false)])];

        let report = engine.net_debts(&records, &roster(&["bee"])).unwrap();
        assert_eq!(report.settlements.len(), 1);
        assert_eq!(report.settlements[0].debtor, Member::new("guest"));
        assert_eq!(report.settlements[0].creditor, Member::new("host"));
    }

    #[test]
    fn test_totals_sum_to_zero() {
        let engine = NettingEngine::default();
        let records = vec![
            record(1, "bee", 100.0, &[("bee", false), ("elsa", false), ("jim", false)]),
            record(2, "elsa", 75.0, &[("elsa", false), ("jim", false), ("betty", false)]),
            record(3, "jim", 42.0, &[("bee", true), ("betty", false)]),
        ];

        let report = engine
            .net_debts(&records, &roster(&["bee", "elsa", "jim", "betty"]))
            .unwrap();

        let sum: f64 = report.totals.values().sum();
        assert!(sum.abs() < SETTLEMENT_TOLERANCE);
    }

    #[test]
    fn test_pairwise_cycles_are_not_collapsed() {
        let engine = NettingEngine::default();
        // bee→elsa→jim→bee, $10 each: pairwise netting leaves all three
        // transfers in place
        let records = vec![
            record(1, "elsa", 10.0, &[("bee", false)]),
            record(2, "jim", 10.0, &[("elsa", false)]),
            record(3, "bee", 10.0, &[("jim", false)]),
        ];

        let report = engine
            .net_debts(&records, &roster(&["bee", "elsa", "jim"]))
            .unwrap();
        assert_eq!(report.settlements.len(), 3);
        // Every participant nets to zero, so totals are empty
        assert!(report.totals.is_empty());
    }

    #[test]
    fn test_invalid_amount_is_rejected() {
        let engine = NettingEngine::default();
        let records = vec![record(1, "bee", -5.0, &[("elsa", false)])];

        let err = engine
            .net_debts(&records, &roster(&["bee", "elsa"]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_deterministic_output() {
        let engine = NettingEngine::default();
        let records = vec![
            record(1, "bee", 100.0, &[("bee", false), ("elsa", false), ("jim", false)]),
            record(2, "jim", 33.0, &[("bee", false), ("elsa", true), ("jim", false)]),
        ];
        let roster = roster(&["bee", "elsa", "jim"]);

        let first = engine.net_debts(&records, &roster).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.net_debts(&records, &roster).unwrap(), first);
        }
    }
}
