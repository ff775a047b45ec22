use serde::{Deserialize, Serialize};

/// Payload of the account holder endpoint, used for validation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsInfoPayload {
    #[serde(default)]
    pub cons_no: Option<String>,
    #[serde(default)]
    pub cons_name: Option<String>,
    #[serde(default)]
    pub elec_addr: Option<String>,
}
