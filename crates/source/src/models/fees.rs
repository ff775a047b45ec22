use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Payload of the fees endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesPayload {
    /// Prepaid balance.
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub prepay_bal: Option<Decimal>,
    /// Amount receivable (still owed).
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub rcv_amt_total: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub amt_total: Option<Decimal>,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub cons_name: Option<String>,
    #[serde(default)]
    pub elec_addr: Option<String>,
}
