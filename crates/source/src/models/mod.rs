//! Power data models
//!
//! This module contains the wire types returned by the utility's platform:
//! - `envelope` - The `{flag, data}` wrapper around every payload
//! - `account` - Account identifiers and request period helpers
//! - `fees` - Balance and receivable amounts
//! - `records` - Annual per-month usage records
//! - `daily` - Per-day readings within a month
//! - `tou` - Time-of-use breakdown for one day
//! - `bills` - Issued bills with price details
//! - `cons_info` - Account holder information

mod account;
mod bills;
mod cons_info;
mod daily;
mod envelope;
mod fees;
pub(crate) mod lenient;
mod records;
mod tou;

pub use account::{AccountIds, YearMonth};
pub use bills::{BillEntry, PayDetail};
pub use cons_info::ConsInfoPayload;
pub use daily::DailyEntry;
pub use envelope::Envelope;
pub use fees::FeesPayload;
pub use records::{AnnualRecordsPayload, ConsDetail, MonthRecord};
pub use tou::TouPayload;
