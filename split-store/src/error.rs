//! Error types for the record store

use split_core::{ArchiveBlocked, Member, RecordId, WeekKey};
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Store errors
#[derive(Error, Debug)]
pub enum Error {
    /// Record not found
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// No records for the requested week
    #[error("No records found for week {0}")]
    WeekNotFound(WeekKey),

    /// Mutation attempted on an archived (terminal) record
    #[error("Record {0} is archived and immutable")]
    RecordArchived(RecordId),

    /// Paid-flag update named a member outside the record's split
    #[error("Member '{member}' is not in the split of record {id}")]
    MemberNotInSplit {
        /// Target record
        id: RecordId,
        /// Unknown member name
        member: Member,
    },

    /// Archive refused by the gate (expected business outcome)
    #[error(transparent)]
    ArchiveBlocked(#[from] ArchiveBlocked),

    /// Core contract violation (invalid record, empty roster)
    #[error(transparent)]
    Core(#[from] split_core::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}
