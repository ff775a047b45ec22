use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Time-of-use consumption for a single day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouPayload {
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub total_pq: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub peak_pq: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub flat_pq: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub valley_pq: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option_decimal")]
    pub day_total_pq: Option<Decimal>,
}
