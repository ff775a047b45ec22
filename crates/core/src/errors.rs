//! Core error types for the powerwatch engine.
//!
//! Per-operation source failures never leave a poll cycle; they are recorded
//! in the cycle report instead. Only the conditions below surface to callers.

use thiserror::Error;

use crate::aggregator::CycleReport;
use powerwatch_source::SourceError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Every operation failed and no earlier cycle ever succeeded, so there
    /// is nothing to fall back to.
    #[error("All source operations failed and no cached data exists: {}", summarize(.report))]
    FatalAggregation { report: CycleReport },

    #[error("Source operation failed: {0}")]
    Source(#[from] SourceError),

    #[error("Account {0} was rejected by the server")]
    InvalidAccount(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),
}

fn summarize(report: &CycleReport) -> String {
    report.failure_summary()
}
