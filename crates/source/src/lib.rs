//! Powerwatch Source Crate
//!
//! This crate is the transport boundary for one electricity account on the
//! utility's web platform.
//!
//! # Overview
//!
//! The platform exposes independent read operations, each answering with a
//! `{flag, data}` envelope:
//! - Fees: balance and receivable amounts
//! - Annual records: per-month usage for a year
//! - Monthly daily: per-day readings (with estimates) for a month
//! - Daily time-of-use: peak/flat/valley split for a day
//! - Yearly bills: issued bills with unit prices
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |    Aggregator    | --> | PowerDataSource  |  (trait, one method per operation)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  HttpPowerSource |  (reqwest, GET + query)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   Envelope<T>    |  (flag + typed payload)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`PowerDataSource`] - Remote read operations of one account
//! - [`SourceOperation`] - Identity of each operation (for logging and reports)
//! - [`Envelope`] - Success flag plus optional payload
//! - [`SourceError`] - Transport, protocol and logical failures

pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{
    AccountIds, AnnualRecordsPayload, BillEntry, ConsDetail, ConsInfoPayload, DailyEntry,
    Envelope, FeesPayload, MonthRecord, PayDetail, TouPayload, YearMonth,
};

// Re-export provider types
pub use provider::{
    HttpPowerSource, MockFailure, MockPowerSource, MockReply, PowerDataSource, SourceOperation,
    DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT,
};

pub use errors::{FailureKind, SourceError};
