//! Year-scoped monthly entities.
//!
//! Monthly fields are keyed by month only. Consumers that want one entity
//! per calendar month per year materialize a fresh set of 24 entities the
//! first time a year shows up in `monthly_summary`.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::constants::MONTH_NAMES;
use crate::poller::SnapshotListener;
use crate::snapshot::{keys, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearlyMetric {
    Usage,
    Amount,
}

impl YearlyMetric {
    pub fn unit(&self) -> &'static str {
        match self {
            YearlyMetric::Usage => "kWh",
            YearlyMetric::Amount => "元",
        }
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            YearlyMetric::Usage => "monthly_usage",
            YearlyMetric::Amount => "monthly_amt",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            YearlyMetric::Usage => "用电量",
            YearlyMetric::Amount => "电费",
        }
    }
}

/// One month's usage or cost, pinned to a calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearScopedEntity {
    pub unique_id: String,
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub metric: YearlyMetric,
}

impl YearScopedEntity {
    /// `month` must be in `1..=12`.
    fn new(cons_no: &str, year: i32, month: u32, metric: YearlyMetric) -> Self {
        let month_name = MONTH_NAMES[(month - 1) as usize];
        Self {
            unique_id: format!("{}_{}_{}_{:02}", cons_no, metric.key_prefix(), year, month),
            name: format!("{}年{}{}", year, month_name, metric.label()),
            year,
            month,
            metric,
        }
    }

    /// Snapshot field this entity reads.
    pub fn field_key(&self) -> String {
        match self.metric {
            YearlyMetric::Usage => keys::monthly_usage(self.month),
            YearlyMetric::Amount => keys::monthly_amt(self.month),
        }
    }

    /// The month's value, only while the snapshot's monthly fields belong to
    /// this entity's year.
    pub fn value(&self, snapshot: &Snapshot) -> Option<Decimal> {
        if snapshot.current_year() != Some(self.year) {
            return None;
        }
        snapshot.decimal(&self.field_key())
    }
}

/// The 24 entities of `year`, usage and cost for each month.
pub fn build_yearly_entities(cons_no: &str, year: i32) -> Vec<YearScopedEntity> {
    (1..=12)
        .flat_map(|month| {
            [
                YearScopedEntity::new(cons_no, year, month, YearlyMetric::Usage),
                YearScopedEntity::new(cons_no, year, month, YearlyMetric::Amount),
            ]
        })
        .collect()
}

/// Years whose entities have been materialized.
pub struct YearlyEntityRegistry {
    cons_no: String,
    years: RwLock<BTreeMap<i32, Vec<YearScopedEntity>>>,
}

impl YearlyEntityRegistry {
    /// Creates the registry with `current_year` already materialized.
    pub fn new(cons_no: impl Into<String>, current_year: i32) -> Self {
        let registry = Self {
            cons_no: cons_no.into(),
            years: RwLock::new(BTreeMap::new()),
        };
        registry.register_year(current_year);
        registry
    }

    /// Materializes `year` unless it already is. Returns whether anything
    /// was added.
    pub fn register_year(&self, year: i32) -> bool {
        let mut years = self.years.write().unwrap_or_else(PoisonError::into_inner);
        if years.contains_key(&year) {
            return false;
        }
        years.insert(year, build_yearly_entities(&self.cons_no, year));
        true
    }

    pub fn years(&self) -> Vec<i32> {
        self.years
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    pub fn entities(&self, year: i32) -> Vec<YearScopedEntity> {
        self.years
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&year)
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.years
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotListener for YearlyEntityRegistry {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        if let Some(year) = snapshot.summary_year() {
            if self.register_year(year) {
                info!("New year {} detected, registered monthly entities", year);
            }
        }
    }
}
