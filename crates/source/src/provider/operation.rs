//! Identity of each remote read operation.

use serde::Serialize;

/// The remote read operations exposed by the utility's web platform.
///
/// The first five are polled every cycle; [`SourceOperation::ConsInfo`] is
/// only used to validate an account before polling starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOperation {
    /// Balance and receivable amounts.
    Fees,
    /// Per-month usage and cost for one year.
    AnnualRecords,
    /// Per-day readings (with estimates) for one month.
    MonthlyDaily,
    /// Time-of-use breakdown for one day.
    DailyTou,
    /// Issued bills for one year, most recent first.
    YearlyBills,
    /// Basic account holder information.
    ConsInfo,
}

impl SourceOperation {
    /// Operations polled on every cycle, in fold order.
    pub const POLLED: [SourceOperation; 5] = [
        SourceOperation::Fees,
        SourceOperation::AnnualRecords,
        SourceOperation::MonthlyDaily,
        SourceOperation::DailyTou,
        SourceOperation::YearlyBills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOperation::Fees => "fees",
            SourceOperation::AnnualRecords => "annual_records",
            SourceOperation::MonthlyDaily => "monthly_daily",
            SourceOperation::DailyTou => "daily_tou",
            SourceOperation::YearlyBills => "yearly_bills",
            SourceOperation::ConsInfo => "cons_info",
        }
    }

    /// Endpoint path relative to the platform base URL.
    pub fn path(&self) -> &'static str {
        match self {
            SourceOperation::Fees => "/getFeesByConsNo",
            SourceOperation::AnnualRecords => "/getRecordList",
            SourceOperation::MonthlyDaily => "/getDaysOfMonthData",
            SourceOperation::DailyTou => "/getDaysOnlyData",
            SourceOperation::YearlyBills => "/getListByYear",
            SourceOperation::ConsInfo => "/getConsInfoByConsNo",
        }
    }
}

impl std::fmt::Display for SourceOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
