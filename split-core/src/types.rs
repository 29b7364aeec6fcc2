//! Core types for the settlement core

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Member name (unique within a roster)
///
/// A member has no identity beyond the name string; roster order determines
/// buyer rotation and uniqueness is enforced by the roster's owner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Member(String);

impl Member {
    /// Create new member name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Member {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Record identifier assigned by the record store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical week label `"<ISO start> ~ <ISO end>"` for a half-open interval
///
/// The label is the sole grouping key for a settlement period: the core
/// compares it by string equality and never parses it back into dates, so
/// producers must format it consistently. [`WeekKey::from_bounds`] is the
/// canonical formatter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey(String);

impl WeekKey {
    /// Create a week key from an already-formatted label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Canonical label for the interval `[start, end)`
    pub fn from_bounds(start: NaiveDate, end: NaiveDate) -> Self {
        Self(format!("{} ~ {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")))
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One participant's share of one record and whether it has been settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitMember {
    /// Member owing the share
    pub name: Member,

    /// Whether the share has been paid back to the buyer
    pub paid: bool,
}

/// One purchase event with a buyer and the people splitting its cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record ID
    pub id: RecordId,

    /// Settlement period the record belongs to
    pub week: WeekKey,

    /// Member who paid up front
    pub buyer: Member,

    /// Item description
    pub description: String,

    /// Purchase amount (non-negative)
    pub amount: f64,

    /// Equal-split participants, each with their own paid flag
    pub split_members: Vec<SplitMember>,

    /// Whether the record is closed (one-way transition, never reversed)
    pub is_archived: bool,
}

impl Record {
    /// Per-person share: `amount / split count`
    ///
    /// `None` for an empty split list; such records contribute nothing to
    /// debt computation.
    pub fn share_amount(&self) -> Option<f64> {
        if self.split_members.is_empty() {
            None
        } else {
            Some(self.amount / self.split_members.len() as f64)
        }
    }

    /// Whether every split member has paid their share
    pub fn is_fully_paid(&self) -> bool {
        self.split_members.iter().all(|m| m.paid)
    }

    /// Check the record against the engine's input contract
    ///
    /// Rejects negative or non-finite amounts and blank names rather than
    /// silently coercing them.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(Error::InvalidRecord {
                id: self.id,
                reason: format!("amount {} is not finite", self.amount),
            });
        }
        if self.amount < 0.0 {
            return Err(Error::InvalidRecord {
                id: self.id,
                reason: format!("amount {} is negative", self.amount),
            });
        }
        if self.buyer.as_str().trim().is_empty() {
            return Err(Error::InvalidRecord {
                id: self.id,
                reason: "buyer name is blank".to_string(),
            });
        }
        if let Some(member) = self
            .split_members
            .iter()
            .find(|m| m.name.as_str().trim().is_empty())
        {
            return Err(Error::InvalidRecord {
                id: self.id,
                reason: format!("split member name {:?} is blank", member.name.as_str()),
            });
        }
        Ok(())
    }
}

/// One minimal residual payment obligation after netting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Member who pays
    pub debtor: Member,

    /// Member who receives
    pub creditor: Member,

    /// Outstanding amount
    pub amount: f64,
}

/// Result of a netting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetReport {
    /// Residual obligations, ordered by (debtor, creditor)
    pub settlements: Vec<Settlement>,

    /// Signed net total per member: positive owes, negative is owed
    ///
    /// Members whose magnitude falls below the engine tolerance are omitted;
    /// the included totals sum to zero.
    pub totals: BTreeMap<Member, f64>,
}
