//! WeekSplit Core
//!
//! Debt netting and buyer rotation for shared weekly purchases.
//!
//! # Architecture
//!
//! The core is a set of pure functions over an immutable snapshot of purchase
//! records:
//!
//! 1. **Rotation**: Derive the buyer responsible for a given week from an
//!    ordered roster and a fixed epoch
//! 2. **Netting**: Convert unarchived records into minimal pairwise
//!    settlement obligations and per-person net totals
//! 3. **Archival Gate**: Authorize the one-way `Open → Archived` transition
//!    for a whole week's records
//!
//! Storage and transport live in external collaborators (see `split-store`);
//! the core performs no I/O and holds no mutable state.
//!
//! # Invariants
//!
//! - Zero-sum: the net totals of a report always sum to zero
//! - Pairwise minimality: after netting, at most one direction of any pair
//!   carries a positive obligation
//! - Determinism: identical inputs yield structurally identical reports
//! - `is_archived` is monotonic: records never leave the archived state

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod archive;
pub mod error;
pub mod netting;
pub mod rotation;
pub mod types;

// Re-exports
pub use archive::{can_archive, ArchiveBlocked, UnpaidShare};
pub use error::{Error, Result};
pub use netting::{NettingEngine, SETTLEMENT_TOLERANCE};
pub use rotation::Rotation;
pub use types::{Member, NetReport, Record, RecordId, Settlement, SplitMember, WeekKey};
