//! Stable field keys of the published snapshot.
//!
//! Consumers address fields by these strings, so they never change even
//! where the name is misleading (`today_*` holds the latest reported day,
//! which is normally yesterday).

// Fees
pub const PREPAY_BAL: &str = "prepay_bal";
pub const RCV_AMT_TOTAL: &str = "rcv_amt_total";
pub const AMT_TOTAL: &str = "amt_total";
pub const ORG_NAME: &str = "org_name";
pub const CONS_NAME: &str = "cons_name";
pub const ELEC_ADDR: &str = "elec_addr";

// Annual records
pub const YEAR_TOTAL_USAGE: &str = "year_total_usage";
pub const YEAR_TOTAL_AMT: &str = "year_total_amt";
pub const MONTH_USAGE: &str = "month_usage";
pub const MONTH_AMT: &str = "month_amt";
pub const LAST_MONTH_USAGE: &str = "last_month_usage";
pub const LAST_MONTH_AMT: &str = "last_month_amt";
pub const MONTHLY_SUMMARY: &str = "monthly_summary";
pub const RECORD_LIST: &str = "record_list";
pub const CURRENT_YEAR: &str = "current_year";

// Monthly daily list
pub const TODAY_USAGE: &str = "today_usage";
pub const TODAY_AMT: &str = "today_amt";
pub const MONTH_ESTI_USAGE: &str = "month_esti_usage";
pub const MONTH_ESTI_AMT: &str = "month_esti_amt";
pub const LAST_MR_DATE: &str = "last_mr_date";
pub const DAILY_LIST: &str = "daily_list";

// Daily time-of-use
pub const TODAY_TOTAL_PQ: &str = "today_total_pq";
pub const TODAY_PEAK_PQ: &str = "today_peak_pq";
pub const TODAY_FLAT_PQ: &str = "today_flat_pq";
pub const TODAY_VALLEY_PQ: &str = "today_valley_pq";
pub const TODAY_DAY_TOTAL_PQ: &str = "today_day_total_pq";

// Yearly bills
pub const UNIT_PRICE: &str = "unit_price";
pub const PRICE_NAME: &str = "price_name";
pub const LATEST_BILL_YM: &str = "latest_bill_ym";
pub const LATEST_BILL_AMT: &str = "latest_bill_amt";
pub const LATEST_BILL_PQ: &str = "latest_bill_pq";
pub const BILL_LIST: &str = "bill_list";

// Snapshot metadata, never stored as fields
pub const USING_CACHE: &str = "_using_cache";
pub const LAST_UPDATED: &str = "_last_updated";

/// `monthly_usage_MM`
pub fn monthly_usage(month: u32) -> String {
    format!("monthly_usage_{:02}", month)
}

/// `monthly_amt_MM`
pub fn monthly_amt(month: u32) -> String {
    format!("monthly_amt_{:02}", month)
}
