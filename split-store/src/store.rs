//! In-memory record store
//!
//! Holds purchase records, assigns ids, and executes the archive transition
//! authorized by the core's archival gate. Mirrors the operations a
//! persistent backend would expose: create, list, per-week reads, paid-flag
//! updates, independent deletes, whole-week archiving, and retention
//! pruning.

use crate::{Config, Error, Result};
use chrono::{DateTime, Duration, Utc};
use split_core::{
    can_archive, Member, NetReport, NettingEngine, Record, RecordId, Rotation, SplitMember,
    WeekKey,
};
use std::collections::BTreeMap;

/// Days an archived record is kept before it becomes prunable
pub const ARCHIVE_RETENTION_DAYS: i64 = 30;

/// Draft of a record before the store assigns its id
///
/// New records always enter the `Open` state; `is_archived` is not a caller
/// choice.
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// Settlement period
    pub week: WeekKey,

    /// Member who paid up front
    pub buyer: Member,

    /// Item description
    pub description: String,

    /// Purchase amount
    pub amount: f64,

    /// Equal-split participants
    pub split_members: Vec<SplitMember>,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    record: Record,
    created_at: DateTime<Utc>,
}

/// In-memory record store
///
/// All mutations take `&mut self`, which serializes the gate's week read
/// against the archive write (see the crate docs).
#[derive(Debug)]
pub struct RecordStore {
    records: BTreeMap<RecordId, StoredRecord>,
    next_id: i64,
    config: Config,
    engine: NettingEngine,
    rotation: Rotation,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl RecordStore {
    /// Create an empty store
    pub fn new(config: Config) -> Self {
        let engine = NettingEngine::new(config.tolerance);
        let rotation = Rotation::new(config.rotation_epoch);
        Self {
            records: BTreeMap::new(),
            next_id: 1,
            config,
            engine,
            rotation,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Insert a new record, assigning the next id
    pub fn add_record(&mut self, draft: NewRecord) -> Result<RecordId> {
        self.add_record_at(draft, Utc::now())
    }

    /// Insert a new record with an explicit creation timestamp
    ///
    /// Used for imports and tests; `add_record` is the common path.
    pub fn add_record_at(&mut self, draft: NewRecord, created_at: DateTime<Utc>) -> Result<RecordId> {
        let id = RecordId(self.next_id);
        let record = Record {
            id,
            week: draft.week,
            buyer: draft.buyer,
            description: draft.description,
            amount: draft.amount,
            split_members: draft.split_members,
            is_archived: false,
        };
        record.validate()?;

        self.next_id += 1;
        tracing::debug!(%id, week = %record.week, "record added");
        self.records.insert(id, StoredRecord { record, created_at });

        Ok(id)
    }

    /// Look up one record
    pub fn record(&self, id: RecordId) -> Result<&Record> {
        self.records
            .get(&id)
            .map(|stored| &stored.record)
            .ok_or(Error::RecordNotFound(id))
    }

    /// All records, newest week first
    pub fn all_records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> =
            self.records.values().map(|stored| &stored.record).collect();
        records.sort_by(|a, b| b.week.cmp(&a.week).then(a.id.cmp(&b.id)));
        records
    }

    /// Unarchived records belonging to one week
    pub fn records_for_week(&self, week: &WeekKey) -> Vec<&Record> {
        self.records
            .values()
            .map(|stored| &stored.record)
            .filter(|r| &r.week == week && !r.is_archived)
            .collect()
    }

    /// Distinct weeks that still have open records, newest first
    pub fn unarchived_weeks(&self) -> Vec<WeekKey> {
        let mut weeks: Vec<WeekKey> = self
            .records
            .values()
            .filter(|stored| !stored.record.is_archived)
            .map(|stored| stored.record.week.clone())
            .collect();
        weeks.sort_by(|a, b| b.cmp(a));
        weeks.dedup();
        weeks
    }

    /// Update one member's paid flag on an open record
    ///
    /// # Errors
    ///
    /// `RecordNotFound` for an unknown id, `RecordArchived` when the record
    /// is already closed, `MemberNotInSplit` when the name is not part of
    /// the record's split.
    pub fn set_paid(&mut self, id: RecordId, member: &Member, paid: bool) -> Result<()> {
        let stored = self.records.get_mut(&id).ok_or(Error::RecordNotFound(id))?;
        if stored.record.is_archived {
            return Err(Error::RecordArchived(id));
        }

        let share = stored
            .record
            .split_members
            .iter_mut()
            .find(|m| &m.name == member)
            .ok_or_else(|| Error::MemberNotInSplit {
                id,
                member: member.clone(),
            })?;

        share.paid = paid;
        tracing::debug!(%id, %member, paid, "paid flag updated");
        Ok(())
    }

    /// Delete one record
    ///
    /// Deletion is independent of the archival gate; every record is
    /// processed independently by the engine, so removal has no invariant
    /// implications.
    pub fn delete_record(&mut self, id: RecordId) -> Result<Record> {
        let stored = self
            .records
            .remove(&id)
            .ok_or(Error::RecordNotFound(id))?;
        tracing::debug!(%id, "record deleted");
        Ok(stored.record)
    }

    /// Archive an entire week
    ///
    /// Runs the archival gate over every record of the week (archived ones
    /// included) and, on authorization, flips `is_archived` on all of them
    /// within this single call — partial archiving is never observable.
    /// Returns the number of records now archived.
    ///
    /// # Errors
    ///
    /// `WeekNotFound` when the week has no records at all;
    /// `ArchiveBlocked` (with every unpaid `(record, member)` pair) when
    /// any share is outstanding, in which case nothing is modified.
    pub fn archive_week(&mut self, week: &WeekKey) -> Result<usize> {
        let week_records: Vec<Record> = self
            .records
            .values()
            .filter(|stored| &stored.record.week == week)
            .map(|stored| stored.record.clone())
            .collect();

        if week_records.is_empty() {
            return Err(Error::WeekNotFound(week.clone()));
        }

        can_archive(&week_records)?;

        let mut archived = 0;
        for stored in self.records.values_mut() {
            if &stored.record.week == week {
                stored.record.is_archived = true;
                archived += 1;
            }
        }

        tracing::info!(%week, archived, "week archived");
        Ok(archived)
    }

    /// Remove archived records older than the configured retention window
    ///
    /// Open records are never pruned regardless of age. Returns the number
    /// of records removed.
    pub fn prune_archived(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(self.config.archive_retention_days);
        let before = self.records.len();
        self.records
            .retain(|_, stored| !stored.record.is_archived || stored.created_at >= cutoff);
        let pruned = before - self.records.len();

        if pruned > 0 {
            tracing::info!(pruned, "stale archived records removed");
        }
        pruned
    }

    /// Net all outstanding obligations across every open record
    pub fn net_outstanding(&self) -> Result<NetReport> {
        let open: Vec<Record> = self
            .records
            .values()
            .filter(|stored| !stored.record.is_archived)
            .map(|stored| stored.record.clone())
            .collect();

        Ok(self.engine.net_debts(&open, &self.config.members())?)
    }

    /// Buyer responsible for the week starting at `week_start`
    pub fn current_buyer(&self, week_start: chrono::NaiveDate) -> Result<Member> {
        let roster = self.config.members();
        let buyer = self.rotation.buyer_for(week_start, &roster)?;
        Ok(buyer.clone())
    }
}
