//! Archival gate for closing a week's ledger
//!
//! A record's archival state is a two-state machine: `Open`
//! (`is_archived = false`) and the terminal `Archived`. The transition fires
//! for a whole week's record set at once and only when this gate authorizes
//! it; nothing ever leaves `Archived`.
//!
//! The gate is a pure predicate — executing the transition (and serializing
//! it against concurrent payment updates) belongs to the storage
//! collaborator.

use crate::types::{Member, Record, RecordId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One unpaid share blocking an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpaidShare {
    /// Record carrying the unpaid share
    pub record_id: RecordId,

    /// Member who has not paid
    pub member: Member,
}

/// Archive refused: the week still has unpaid shares
///
/// An expected, recoverable business outcome rather than a system failure;
/// it lists every offending `(record, member)` pair so callers can present
/// an actionable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cannot archive: {} unpaid share(s), first is member '{}' on record {}",
    .unpaid.len(), .unpaid[0].member, .unpaid[0].record_id)]
pub struct ArchiveBlocked {
    /// All unpaid shares in the week, in record order (never empty)
    pub unpaid: Vec<UnpaidShare>,
}

/// Decide whether a week's records may be archived
///
/// Permitted iff every split member of every record in the week has paid.
/// An empty week is vacuously permitted. On `Ok` the caller is authorized to
/// flip `is_archived` on the entire week as one atomic transition; partial
/// archiving must never be observable.
pub fn can_archive(week_records: &[Record]) -> Result<(), ArchiveBlocked> {
    let unpaid: Vec<UnpaidShare> = week_records
        .iter()
        .flat_map(|record| {
            record
                .split_members
                .iter()
                .filter(|member| !member.paid)
                .map(move |member| UnpaidShare {
                    record_id: record.id,
                    member: member.name.clone(),
                })
        })
        .collect();

    if unpaid.is_empty() {
        Ok(())
    } else {
        Err(ArchiveBlocked { unpaid })
    }
}
