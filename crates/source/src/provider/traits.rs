//! Power data source trait definitions.
//!
//! This module defines the `PowerDataSource` trait that the aggregator
//! polls. The HTTP client in [`super::http`] is the production
//! implementation; tests substitute scripted sources.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::SourceError;
use crate::models::{
    AccountIds, AnnualRecordsPayload, BillEntry, ConsInfoPayload, DailyEntry, Envelope,
    FeesPayload, TouPayload, YearMonth,
};

use super::SourceOperation;

/// Remote read operations of one account.
///
/// Every method returns the raw [`Envelope`]; an `Err` means the exchange
/// itself failed (transport or protocol). Interpreting `flag=false` is left
/// to the caller.
///
/// # Example
///
/// ```ignore
/// use powerwatch_source::{AccountIds, HttpPowerSource, PowerDataSource};
///
/// let source = HttpPowerSource::new(AccountIds::new("1234567890", "14401"));
/// let fees = source.fees().await?.into_payload(SourceOperation::Fees)?;
/// ```
#[async_trait]
pub trait PowerDataSource: Send + Sync {
    /// Identifiers the source queries with.
    fn account(&self) -> &AccountIds;

    /// Balance and receivable amounts.
    async fn fees(&self) -> Result<Envelope<FeesPayload>, SourceError>;

    /// Per-month usage records for `year`.
    async fn annual_records(&self, year: i32)
        -> Result<Envelope<AnnualRecordsPayload>, SourceError>;

    /// Per-day entries of `month`.
    async fn monthly_daily(&self, month: YearMonth)
        -> Result<Envelope<Vec<DailyEntry>>, SourceError>;

    /// Time-of-use breakdown for `day`.
    async fn daily_tou(&self, day: NaiveDate) -> Result<Envelope<TouPayload>, SourceError>;

    /// Bills issued between January and December of `year`.
    async fn yearly_bills(&self, year: i32) -> Result<Envelope<Vec<BillEntry>>, SourceError>;

    /// Account holder information.
    ///
    /// Default implementation reports the operation as unavailable.
    async fn cons_info(&self) -> Result<Envelope<ConsInfoPayload>, SourceError> {
        Err(SourceError::Rejected {
            operation: SourceOperation::ConsInfo,
            message: Some("not supported by this source".to_string()),
        })
    }

    /// Checks that the configured account exists.
    ///
    /// `Ok(false)` means the server answered and rejected the account;
    /// `Err` means the server could not be reached.
    async fn validate_connection(&self) -> Result<bool, SourceError> {
        Ok(self.cons_info().await?.is_success())
    }
}
