use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// One issued bill. The endpoint returns bills most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillEntry {
    /// Billing period label, `YYYYMM`.
    #[serde(default)]
    pub rcvbl_ym: Option<String>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub rcvbl_amt: Option<Decimal>,
    /// Billed quantity (kWh).
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub t_pq: Option<Decimal>,
    #[serde(default)]
    pub pay_detail_list: Vec<PayDetail>,
}

/// Price line of a bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayDetail {
    /// Unit price per kWh.
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub kwh_prc: Option<Decimal>,
    /// Price plan name.
    #[serde(default)]
    pub prc_name: Option<String>,
}
