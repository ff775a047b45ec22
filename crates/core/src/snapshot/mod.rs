//! Snapshot module.
//!
//! - [`snapshot_model`] - Field values and the immutable published snapshot
//! - [`cache`] - Key-level last-known-good store owned by the aggregator
//! - [`keys`] - Stable field names

pub mod cache;
pub mod keys;
pub mod snapshot_model;

pub use cache::SnapshotCache;
pub use snapshot_model::{FieldValue, Fields, MonthlyEntry, MonthlySummary, Snapshot};
