//! Error types for the settlement core

use crate::types::RecordId;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core errors
///
/// `ArchiveBlocked` is deliberately *not* part of this enum: a blocked
/// archive is an expected business outcome, not a defect, and is returned
/// as its own type by [`crate::archive::can_archive`].
#[derive(Error, Debug)]
pub enum Error {
    /// Rotation queried against an empty roster
    #[error("Rotation undefined: roster is empty")]
    EmptyRoster,

    /// Record violates the input contract (negative/non-finite amount,
    /// malformed split list)
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord {
        /// Offending record
        id: RecordId,
        /// Human-readable contract violation
        reason: String,
    },
}
