//! Validated account and polling settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use powerwatch_source::AccountIds;

use crate::constants::{
    DEFAULT_SCAN_INTERVAL_MINUTES, MAX_SCAN_INTERVAL_MINUTES, MIN_SCAN_INTERVAL_MINUTES,
};
use crate::errors::{Error, Result};

/// Account identifiers as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    pub cons_no: String,
    pub org_no: String,
    #[serde(default)]
    pub open_id: Option<String>,
}

impl AccountConfig {
    pub fn new(cons_no: impl Into<String>, org_no: impl Into<String>) -> Self {
        Self {
            cons_no: cons_no.into(),
            org_no: org_no.into(),
            open_id: None,
        }
    }

    pub fn with_open_id(mut self, open_id: impl Into<String>) -> Self {
        self.open_id = Some(open_id.into());
        self
    }

    /// Trims every identifier and rejects blank required ones.
    pub fn validate(&self) -> Result<AccountIds> {
        let cons_no = required("cons_no", &self.cons_no)?;
        let org_no = required("org_no", &self.org_no)?;
        let ids = AccountIds::new(cons_no, org_no);
        Ok(match self.open_id.as_deref() {
            Some(open_id) => ids.with_open_id(open_id.trim()),
            None => ids,
        })
    }
}

fn required(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingConfigKey(key.to_string()));
    }
    Ok(value.to_string())
}

/// Poll interval, always within the accepted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollConfig {
    interval_minutes: u32,
}

impl PollConfig {
    pub fn new(interval_minutes: u32) -> Result<Self> {
        if !(MIN_SCAN_INTERVAL_MINUTES..=MAX_SCAN_INTERVAL_MINUTES).contains(&interval_minutes) {
            return Err(Error::InvalidConfigValue(format!(
                "scan interval must be between {} and {} minutes, got {}",
                MIN_SCAN_INTERVAL_MINUTES, MAX_SCAN_INTERVAL_MINUTES, interval_minutes
            )));
        }
        Ok(Self { interval_minutes })
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_minutes) * 60)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_SCAN_INTERVAL_MINUTES,
        }
    }
}
