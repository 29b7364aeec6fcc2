//! WeekSplit Record Store
//!
//! In-memory reference implementation of the storage collaborator the
//! settlement core is specified against: CRUD plumbing for purchase records,
//! paid-flag updates, the atomic per-week archive transition, and retention
//! pruning of closed weeks.
//!
//! # Concurrency contract
//!
//! The archival gate's read of "all records for a week" and the write of the
//! archive transition must be serialized per week, or a racing payment
//! update could stale-authorize an archive. This implementation satisfies
//! that trivially: every mutation takes `&mut self`, so the borrow checker
//! enforces exclusive access. A persistent backend would use a transaction
//! or per-week mutex instead.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod store;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use store::{NewRecord, RecordStore, ARCHIVE_RETENTION_DAYS};
