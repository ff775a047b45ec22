//! Key-level store of last known good values.

use chrono::NaiveDateTime;

use super::snapshot_model::{Fields, Snapshot};

/// Last known good value per field plus freshness metadata.
///
/// Not synchronized; the aggregator owns it and serializes access.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    fields: Fields,
    last_updated: Option<NaiveDateTime>,
    stale: bool,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the keys present in `partial`, stamps `now` and clears the
    /// stale flag. Keys absent from `partial` keep their cached values.
    pub fn merge(&mut self, partial: Fields, now: NaiveDateTime) {
        self.fields.extend(partial);
        self.last_updated = Some(now);
        self.stale = false;
    }

    /// Flags the cached values as served from a failed cycle.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.fields.clone(), self.stale, self.last_updated)
    }

    /// True until a merge has stored at least one field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn last_updated(&self) -> Option<NaiveDateTime> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::keys;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 15)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = SnapshotCache::new();
        assert!(cache.is_empty());
        assert!(!cache.is_stale());
        assert!(cache.snapshot().is_empty());
    }

    #[test]
    fn test_merge_keeps_untouched_keys() {
        let mut cache = SnapshotCache::new();
        let mut first = Fields::new();
        first.insert(keys::PREPAY_BAL, dec!(100));
        first.insert(keys::UNIT_PRICE, dec!(0.477));
        cache.merge(first, at(8));

        let mut second = Fields::new();
        second.insert(keys::PREPAY_BAL, dec!(95.5));
        cache.merge(second, at(9));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.decimal(keys::PREPAY_BAL), Some(dec!(95.5)));
        assert_eq!(snapshot.decimal(keys::UNIT_PRICE), Some(dec!(0.477)));
        assert_eq!(snapshot.last_updated(), Some(at(9)));
    }

    #[test]
    fn test_mark_stale_leaves_data_and_merge_clears_it() {
        let mut cache = SnapshotCache::new();
        let mut fields = Fields::new();
        fields.insert(keys::PREPAY_BAL, dec!(100));
        cache.merge(fields.clone(), at(8));

        cache.mark_stale();
        let stale = cache.snapshot();
        assert!(stale.is_using_cache());
        assert_eq!(stale.decimal(keys::PREPAY_BAL), Some(dec!(100)));
        assert_eq!(stale.last_updated(), Some(at(8)));

        cache.merge(fields, at(8) + Duration::hours(1));
        assert!(!cache.is_stale());
        assert!(!cache.snapshot().is_using_cache());
    }

    #[test]
    fn test_merge_with_no_fields_leaves_cache_empty() {
        let mut cache = SnapshotCache::new();
        cache.merge(Fields::new(), at(8));
        assert!(cache.is_empty());

        let mut fields = Fields::new();
        fields.insert(keys::PREPAY_BAL, dec!(100));
        cache.merge(fields, at(9));
        assert!(!cache.is_empty());
    }
}
