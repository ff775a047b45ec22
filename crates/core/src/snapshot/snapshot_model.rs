//! Field values and the published snapshot.

use std::collections::btree_map::{self, BTreeMap};

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::keys;
use crate::constants::TIMESTAMP_FORMAT;

/// One entry of [`MonthlySummary::months`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyEntry {
    pub month: u32,
    /// Localized month name.
    pub name: String,
    /// Consumption (kWh).
    pub usage: Decimal,
    /// Cost.
    pub amount: Decimal,
}

/// Per-month breakdown of one year, tagged with that year so consumers can
/// tell when a new year's data starts flowing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub months: Vec<MonthlyEntry>,
}

/// Value of a single snapshot field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Decimal),
    Text(String),
    Summary(MonthlySummary),
    /// Payload passed through unchanged (raw record, daily and bill lists).
    Raw(serde_json::Value),
}

impl FieldValue {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_summary(&self) -> Option<&MonthlySummary> {
        match self {
            FieldValue::Summary(summary) => Some(summary),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(value) if value.trim().is_empty())
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<MonthlySummary> for FieldValue {
    fn from(value: MonthlySummary) -> Self {
        FieldValue::Summary(value)
    }
}

/// Keyed field values, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Inserts `value` only when present; absent payload values never
    /// overwrite a cached one.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Into<FieldValue>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }

    /// Overwrites every key present in `other`, leaving the rest untouched.
    pub fn extend(&mut self, other: Fields) {
        self.0.extend(other.0);
    }

    /// Copies keys from `defaults` that are missing here or hold blank text.
    pub fn fill_missing(&mut self, defaults: Fields) {
        for (key, value) in defaults.0 {
            match self.0.entry(key) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                btree_map::Entry::Occupied(mut slot) => {
                    if slot.get().is_blank() {
                        slot.insert(value);
                    }
                }
            }
        }
    }
}

impl FromIterator<(String, FieldValue)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Fields {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Immutable view of everything currently known about the account.
///
/// Serializes flat: every field key plus `_using_cache` and `_last_updated`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    fields: Fields,
    #[serde(rename = "_using_cache")]
    using_cache: bool,
    #[serde(
        rename = "_last_updated",
        serialize_with = "serialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    last_updated: Option<NaiveDateTime>,
}

fn serialize_timestamp<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

impl Snapshot {
    pub fn new(fields: Fields, using_cache: bool, last_updated: Option<NaiveDateTime>) -> Self {
        Self {
            fields,
            using_cache,
            last_updated,
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        self.get(key).and_then(FieldValue::as_decimal)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn monthly_summary(&self) -> Option<&MonthlySummary> {
        self.get(keys::MONTHLY_SUMMARY)
            .and_then(FieldValue::as_summary)
    }

    /// Year of the most recent monthly summary.
    pub fn summary_year(&self) -> Option<i32> {
        self.monthly_summary().map(|summary| summary.year)
    }

    /// Year the monthly fields were last written for.
    pub fn current_year(&self) -> Option<i32> {
        self.decimal(keys::CURRENT_YEAR)
            .and_then(|year| year.to_i32())
            .or_else(|| self.summary_year())
    }

    /// True when every operation failed in the cycle that produced this
    /// snapshot and the values come from earlier cycles.
    pub fn is_using_cache(&self) -> bool {
        self.using_cache
    }

    /// Local time of the last cycle in which any operation succeeded.
    pub fn last_updated(&self) -> Option<NaiveDateTime> {
        self.last_updated
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
