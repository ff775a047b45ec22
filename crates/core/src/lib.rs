//! Powerwatch Core - Poll, merge and fallback engine for one electricity account.
//!
//! Each poll cycle calls every remote operation of the account concurrently,
//! extracts fields from whichever succeed, merges them key by key into a
//! cache, and publishes the result. When every operation fails the previous
//! snapshot is republished and flagged as stale.

pub mod aggregator;
pub mod clock;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod poller;
pub mod settings;
pub mod snapshot;

pub use aggregator::{Aggregator, CycleOutcome, CycleReport, CycleStatus};
pub use poller::{PollScheduler, PollState, SnapshotListener, TriggerOutcome};
pub use snapshot::{FieldValue, Fields, Snapshot};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
