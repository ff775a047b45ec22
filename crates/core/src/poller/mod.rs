//! Poll scheduling and snapshot publication.
//!
//! - [`poller_service`] - Single-flight cycle runner, interval loop, latest snapshot
//! - [`listener`] - Snapshot consumers

pub mod listener;
pub mod poller_service;

pub use listener::{MockSnapshotListener, NoOpSnapshotListener, SnapshotListener};
pub use poller_service::{PollScheduler, PollState, TriggerOutcome};
