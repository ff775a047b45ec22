//! Poll-cycle aggregation.
//!
//! - [`extract`] - Payload to field extraction, one function per operation
//! - [`aggregator_service`] - Concurrent fan-out, selective merge and stale fallback
//! - [`cycle_report`] - Per-operation outcome of a cycle

pub mod aggregator_service;
pub mod cycle_report;
pub mod extract;

pub use aggregator_service::{Aggregator, CycleOutcome, CycleStatus};
pub use cycle_report::{CycleReport, OperationReport, OperationStatus};
pub use extract::Extracted;
