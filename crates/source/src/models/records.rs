use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Payload of the annual record endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualRecordsPayload {
    #[serde(default)]
    pub cons_detail: Option<ConsDetail>,
    #[serde(default)]
    pub record_list: Vec<MonthRecord>,
}

/// Year-level totals and holder details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsDetail {
    /// Year-to-date consumption (kWh).
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub max_pq: Option<Decimal>,
    /// Year-to-date cost.
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub amt_total: Option<Decimal>,
    #[serde(default)]
    pub cons_name: Option<String>,
    #[serde(default)]
    pub elec_addr: Option<String>,
}

/// Usage and cost for one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    /// Month number, `1..=12`; `0` when the server omitted it.
    #[serde(default, deserialize_with = "lenient::month")]
    pub month: u32,
    /// Consumption (kWh).
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub this_pq: Option<Decimal>,
    /// Cost.
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub prices: Option<Decimal>,
}

impl MonthRecord {
    pub fn new(month: u32, this_pq: Decimal, prices: Decimal) -> Self {
        Self {
            month,
            this_pq: Some(this_pq),
            prices: Some(prices),
        }
    }
}
