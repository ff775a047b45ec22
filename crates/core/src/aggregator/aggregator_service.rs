//! One poll cycle: fan out to every operation, fold the results into the
//! cache, fall back to cached values when the cycle produced no fields.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use log::{debug, warn};
use serde::Serialize;

use powerwatch_source::{
    AccountIds, Envelope, PowerDataSource, SourceError, SourceOperation, YearMonth,
};

use super::cycle_report::CycleReport;
use super::extract::{self, Extracted};
use crate::clock::{Clock, SystemClock};
use crate::constants::DEFAULT_OPERATION_TIMEOUT;
use crate::errors::{Error, Result};
use crate::snapshot::{Fields, Snapshot, SnapshotCache};

/// How a non-fatal cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// The succeeded operations produced fields and they were merged.
    Merged,
    /// No fields were produced; the snapshot is the previous cache content.
    StaleServed,
}

#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub status: CycleStatus,
    pub snapshot: Snapshot,
    pub report: CycleReport,
}

/// Owns the snapshot cache and runs poll cycles against a source.
pub struct Aggregator {
    source: Arc<dyn PowerDataSource>,
    clock: Arc<dyn Clock>,
    cache: SnapshotCache,
    request_timeout: Duration,
}

impl Aggregator {
    pub fn new(source: Arc<dyn PowerDataSource>) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            cache: SnapshotCache::new(),
            request_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Upper bound on each operation call within a cycle.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn account(&self) -> &AccountIds {
        self.source.account()
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Runs one cycle.
    ///
    /// Individual operation failures are logged and recorded in the report.
    /// Returns [`Error::FatalAggregation`] only when the cycle produced no
    /// fields and the cache holds none either.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let now = self.clock.now();
        let today = now.date();
        let year = today.year();
        let limit = self.request_timeout;
        let source = self.source.as_ref();

        debug!(
            "Polling account {} for {}",
            source.account().cons_no,
            today
        );

        let (fees, records, daily, tou, bills) = tokio::join!(
            bounded(limit, SourceOperation::Fees, source.fees()),
            bounded(
                limit,
                SourceOperation::AnnualRecords,
                source.annual_records(year)
            ),
            bounded(
                limit,
                SourceOperation::MonthlyDaily,
                source.monthly_daily(YearMonth::of(today))
            ),
            bounded(limit, SourceOperation::DailyTou, source.daily_tou(today)),
            bounded(limit, SourceOperation::YearlyBills, source.yearly_bills(year)),
        );

        let outcomes: [(SourceOperation, std::result::Result<Extracted, SourceError>); 5] = [
            (
                SourceOperation::Fees,
                fees.and_then(|p| extract::fees_fields(&p)),
            ),
            (
                SourceOperation::AnnualRecords,
                records.and_then(|p| extract::annual_record_fields(&p, today)),
            ),
            (
                SourceOperation::MonthlyDaily,
                daily.and_then(|p| extract::monthly_daily_fields(&p, today)),
            ),
            (
                SourceOperation::DailyTou,
                tou.and_then(|p| extract::tou_fields(&p)),
            ),
            (
                SourceOperation::YearlyBills,
                bills.and_then(|p| extract::bill_fields(&p)),
            ),
        ];

        let mut report = CycleReport::new(now);
        let mut fields = Fields::new();
        let mut defaults = Fields::new();
        for (operation, outcome) in outcomes {
            match outcome {
                Ok(extracted) => {
                    report.record_success(operation, extracted.fields.len());
                    fields.extend(extracted.fields);
                    defaults.extend(extracted.defaults);
                }
                Err(err) => {
                    warn!("{} failed ({}): {}", operation, err.kind(), err);
                    report.record_failure(&err);
                }
            }
        }
        fields.fill_missing(defaults);

        if !fields.is_empty() {
            debug!(
                "Merging {} fields from {} operations",
                fields.len(),
                report.succeeded().count()
            );
            self.cache.merge(fields, now);
            return Ok(CycleOutcome {
                status: CycleStatus::Merged,
                snapshot: self.cache.snapshot(),
                report,
            });
        }

        if self.cache.is_empty() {
            return Err(Error::FatalAggregation { report });
        }

        warn!(
            "No fields produced ({} operations failed), serving cached data from {}",
            report.failed().count(),
            self.cache
                .last_updated()
                .map(|ts| ts.to_string())
                .unwrap_or_default()
        );
        self.cache.mark_stale();
        Ok(CycleOutcome {
            status: CycleStatus::StaleServed,
            snapshot: self.cache.snapshot(),
            report,
        })
    }
}

/// Awaits one operation within `limit` and unwraps its envelope.
async fn bounded<T, F>(
    limit: Duration,
    operation: SourceOperation,
    call: F,
) -> std::result::Result<T, SourceError>
where
    F: Future<Output = std::result::Result<Envelope<T>, SourceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result?.into_payload(operation),
        Err(_) => Err(SourceError::Timeout { operation }),
    }
}
