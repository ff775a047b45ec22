use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// One day's entry from the monthly daily endpoint.
///
/// Readings lag by a day: the entry for a date usually carries the previous
/// day's consumption in `day_esti_pq`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    /// Date as `YYYYMMDD`.
    #[serde(default)]
    pub ymd: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub day_esti_pq: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub day_esti_amt: Option<Decimal>,
    /// Month-to-date estimated consumption.
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub esti_pq: Option<Decimal>,
    /// Month-to-date estimated cost.
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub esti_amt: Option<Decimal>,
    #[serde(default)]
    pub last_mr_date: Option<String>,
}
