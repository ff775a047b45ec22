//! Response bodies of the HTTP API.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use powerwatch_core::aggregator::CycleReport;
use powerwatch_core::entities::{YearScopedEntity, YearlyMetric};
use powerwatch_core::{CycleStatus, PollState, Snapshot};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub status: CycleStatus,
    pub using_cache: bool,
    pub last_updated: Option<NaiveDateTime>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub state: PollState,
    pub scan_interval_minutes: u32,
    pub last_cycle: Option<CycleReport>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanIntervalUpdate {
    pub minutes: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyEntityView {
    pub unique_id: String,
    pub name: String,
    pub month: u32,
    pub metric: YearlyMetric,
    pub unit: &'static str,
    pub value: Option<Decimal>,
}

impl YearlyEntityView {
    pub fn new(entity: &YearScopedEntity, snapshot: Option<&Snapshot>) -> Self {
        Self {
            unique_id: entity.unique_id.clone(),
            name: entity.name.clone(),
            month: entity.month,
            metric: entity.metric,
            unit: entity.metric.unit(),
            value: snapshot.and_then(|s| entity.value(s)),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyEntitiesResponse {
    pub year: i32,
    pub entities: Vec<YearlyEntityView>,
}
