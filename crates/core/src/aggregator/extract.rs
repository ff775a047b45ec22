//! Field extraction from operation payloads.
//!
//! Each function turns one successful payload into the snapshot fields that
//! operation owns. Dates come from the caller so a cycle sees one instant.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use powerwatch_source::{
    AnnualRecordsPayload, BillEntry, DailyEntry, FeesPayload, SourceError, SourceOperation,
    TouPayload, YearMonth,
};

use crate::constants::month_name;
use crate::snapshot::{keys, FieldValue, Fields, MonthlyEntry, MonthlySummary};

/// Fields produced by one operation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extracted {
    /// Written unconditionally.
    pub fields: Fields,
    /// Written only where no operation produced a non-blank value this cycle.
    pub defaults: Fields,
}

impl Extracted {
    fn new(fields: Fields) -> Self {
        Self {
            fields,
            defaults: Fields::new(),
        }
    }
}

fn number(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn raw<T: Serialize>(operation: SourceOperation, value: &T) -> Result<FieldValue, SourceError> {
    serde_json::to_value(value)
        .map(FieldValue::Raw)
        .map_err(|e| SourceError::Decode {
            operation,
            message: e.to_string(),
        })
}

pub fn fees_fields(payload: &FeesPayload) -> Result<Extracted, SourceError> {
    let mut fields = Fields::new();
    fields.insert(keys::PREPAY_BAL, number(payload.prepay_bal));
    fields.insert(keys::RCV_AMT_TOTAL, number(payload.rcv_amt_total));
    fields.insert(keys::AMT_TOTAL, number(payload.amt_total));
    fields.insert(keys::ORG_NAME, text(payload.org_name.as_ref()));
    fields.insert(keys::CONS_NAME, text(payload.cons_name.as_ref()));
    fields.insert(keys::ELEC_ADDR, text(payload.elec_addr.as_ref()));
    Ok(Extracted::new(fields))
}

/// Fields of the current year's record list.
///
/// "Current" and "last" month come from `today`; the last month of January
/// is looked up as month 12 of the same list.
pub fn annual_record_fields(
    payload: &AnnualRecordsPayload,
    today: NaiveDate,
) -> Result<Extracted, SourceError> {
    let year = today.year();
    let current_month = today.month();
    let last_month = YearMonth::of(today).previous().month;

    let mut fields = Fields::new();
    let mut defaults = Fields::new();

    let detail = payload.cons_detail.clone().unwrap_or_default();
    fields.insert(keys::YEAR_TOTAL_USAGE, number(detail.max_pq));
    fields.insert(keys::YEAR_TOTAL_AMT, number(detail.amt_total));
    for (key, value) in [
        (keys::CONS_NAME, &detail.cons_name),
        (keys::ELEC_ADDR, &detail.elec_addr),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            defaults.insert(key, value);
        }
    }

    let mut months = Vec::new();
    for record in &payload.record_list {
        let usage = number(record.this_pq);
        let amount = number(record.prices);

        if record.month == current_month {
            fields.insert(keys::MONTH_USAGE, usage);
            fields.insert(keys::MONTH_AMT, amount);
        } else if record.month == last_month {
            fields.insert(keys::LAST_MONTH_USAGE, usage);
            fields.insert(keys::LAST_MONTH_AMT, amount);
        }

        if let Some(name) = month_name(record.month) {
            fields.insert(keys::monthly_usage(record.month), usage);
            fields.insert(keys::monthly_amt(record.month), amount);
            months.push(MonthlyEntry {
                month: record.month,
                name: name.to_string(),
                usage,
                amount,
            });
        }
    }

    fields.insert(keys::MONTHLY_SUMMARY, MonthlySummary { year, months });
    fields.insert(
        keys::RECORD_LIST,
        raw(SourceOperation::AnnualRecords, &payload.record_list)?,
    );
    fields.insert(keys::CURRENT_YEAR, Decimal::from(year));

    Ok(Extracted { fields, defaults })
}

/// Picks the entry for `today`, or else the last entry carrying a daily
/// reading. Readings lag a day, so the fallback is normally yesterday.
pub fn select_daily_entry(entries: &[DailyEntry], today: NaiveDate) -> Option<&DailyEntry> {
    let today = today.format("%Y%m%d").to_string();
    entries
        .iter()
        .find(|entry| entry.ymd.as_deref() == Some(today.as_str()))
        .or_else(|| entries.iter().rev().find(|entry| entry.day_esti_pq.is_some()))
}

pub fn monthly_daily_fields(
    entries: &[DailyEntry],
    today: NaiveDate,
) -> Result<Extracted, SourceError> {
    let mut fields = Fields::new();
    fields.insert(keys::DAILY_LIST, raw(SourceOperation::MonthlyDaily, &entries)?);

    if let Some(entry) = select_daily_entry(entries, today) {
        fields.insert(keys::TODAY_USAGE, number(entry.day_esti_pq));
        fields.insert(keys::TODAY_AMT, number(entry.day_esti_amt));
        fields.insert(keys::MONTH_ESTI_USAGE, number(entry.esti_pq));
        fields.insert(keys::MONTH_ESTI_AMT, number(entry.esti_amt));
        fields.insert(keys::LAST_MR_DATE, text(entry.last_mr_date.as_ref()));
    }

    Ok(Extracted::new(fields))
}

pub fn tou_fields(payload: &TouPayload) -> Result<Extracted, SourceError> {
    let mut fields = Fields::new();
    fields.insert_opt(keys::TODAY_TOTAL_PQ, payload.total_pq);
    fields.insert_opt(keys::TODAY_PEAK_PQ, payload.peak_pq);
    fields.insert_opt(keys::TODAY_FLAT_PQ, payload.flat_pq);
    fields.insert_opt(keys::TODAY_VALLEY_PQ, payload.valley_pq);
    fields.insert_opt(keys::TODAY_DAY_TOTAL_PQ, payload.day_total_pq);
    Ok(Extracted::new(fields))
}

/// Fields of the most recent bill. An empty list is a logical failure.
pub fn bill_fields(bills: &[BillEntry]) -> Result<Extracted, SourceError> {
    let latest = bills.first().ok_or(SourceError::EmptyPayload {
        operation: SourceOperation::YearlyBills,
    })?;

    let mut fields = Fields::new();
    if let Some(detail) = latest.pay_detail_list.first() {
        fields.insert(keys::UNIT_PRICE, number(detail.kwh_prc));
        fields.insert(keys::PRICE_NAME, text(detail.prc_name.as_ref()));
    }
    fields.insert(keys::LATEST_BILL_YM, text(latest.rcvbl_ym.as_ref()));
    fields.insert(keys::LATEST_BILL_AMT, number(latest.rcvbl_amt));
    fields.insert(keys::LATEST_BILL_PQ, number(latest.t_pq));
    fields.insert(keys::BILL_LIST, raw(SourceOperation::YearlyBills, &bills)?);

    Ok(Extracted::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerwatch_source::{ConsDetail, MonthRecord, PayDetail};
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(ymd: &str, day_esti_pq: Option<Decimal>) -> DailyEntry {
        DailyEntry {
            ymd: Some(ymd.to_string()),
            day_esti_pq,
            ..Default::default()
        }
    }

    #[test]
    fn test_fees_defaults_missing_values() {
        let extracted = fees_fields(&FeesPayload {
            prepay_bal: Some(dec!(88.2)),
            ..Default::default()
        })
        .unwrap();
        let fields = extracted.fields;
        assert_eq!(fields.len(), 6);
        assert_eq!(fields.get(keys::PREPAY_BAL).unwrap().as_decimal(), Some(dec!(88.2)));
        assert_eq!(fields.get(keys::AMT_TOTAL).unwrap().as_decimal(), Some(Decimal::ZERO));
        assert_eq!(fields.get(keys::CONS_NAME).unwrap().as_text(), Some(""));
    }

    #[test]
    fn test_record_list_current_and_last_month() {
        let payload = AnnualRecordsPayload {
            cons_detail: None,
            record_list: vec![
                MonthRecord::new(3, dec!(100), dec!(50.0)),
                MonthRecord::new(4, dec!(120), dec!(60.0)),
            ],
        };
        let fields = annual_record_fields(&payload, day(2026, 4, 15))
            .unwrap()
            .fields;

        let get = |key: &str| fields.get(key).and_then(FieldValue::as_decimal);
        assert_eq!(get(keys::MONTH_USAGE), Some(dec!(120)));
        assert_eq!(get(keys::MONTH_AMT), Some(dec!(60.0)));
        assert_eq!(get(keys::LAST_MONTH_USAGE), Some(dec!(100)));
        assert_eq!(get(keys::LAST_MONTH_AMT), Some(dec!(50.0)));
        assert_eq!(get("monthly_usage_04"), Some(dec!(120)));
        assert_eq!(get("monthly_usage_03"), Some(dec!(100)));
        assert_eq!(get("monthly_amt_03"), Some(dec!(50.0)));
        assert_eq!(get(keys::CURRENT_YEAR), Some(dec!(2026)));
        assert!(!fields.contains_key("monthly_usage_05"));

        let summary = fields
            .get(keys::MONTHLY_SUMMARY)
            .and_then(FieldValue::as_summary)
            .unwrap();
        assert_eq!(summary.year, 2026);
        assert_eq!(summary.months.len(), 2);
        assert_eq!(summary.months[1].name, "四月");
    }

    #[test]
    fn test_january_last_month_is_december_of_same_list() {
        let payload = AnnualRecordsPayload {
            cons_detail: None,
            record_list: vec![
                MonthRecord::new(1, dec!(80), dec!(40)),
                MonthRecord::new(12, dec!(90), dec!(45)),
            ],
        };
        let fields = annual_record_fields(&payload, day(2027, 1, 3))
            .unwrap()
            .fields;
        assert_eq!(
            fields.get(keys::LAST_MONTH_USAGE).unwrap().as_decimal(),
            Some(dec!(90))
        );
        assert_eq!(
            fields.get(keys::MONTH_USAGE).unwrap().as_decimal(),
            Some(dec!(80))
        );
    }

    #[test]
    fn test_out_of_range_months_are_skipped() {
        let payload = AnnualRecordsPayload {
            cons_detail: None,
            record_list: vec![
                MonthRecord::new(0, dec!(1), dec!(1)),
                MonthRecord::new(13, dec!(1), dec!(1)),
            ],
        };
        let fields = annual_record_fields(&payload, day(2026, 6, 1))
            .unwrap()
            .fields;
        assert!(!fields.keys().any(|k| k.starts_with("monthly_usage_")));
        let summary = fields
            .get(keys::MONTHLY_SUMMARY)
            .and_then(FieldValue::as_summary)
            .unwrap();
        assert!(summary.months.is_empty());
    }

    #[test]
    fn test_cons_detail_totals_and_name_defaults() {
        let payload = AnnualRecordsPayload {
            cons_detail: Some(ConsDetail {
                max_pq: Some(dec!(1320)),
                amt_total: Some(dec!(660.5)),
                cons_name: Some("张三".to_string()),
                elec_addr: Some(" ".to_string()),
            }),
            record_list: vec![],
        };
        let extracted = annual_record_fields(&payload, day(2026, 6, 1)).unwrap();
        assert_eq!(
            extracted.fields.get(keys::YEAR_TOTAL_USAGE).unwrap().as_decimal(),
            Some(dec!(1320))
        );
        assert!(!extracted.fields.contains_key(keys::CONS_NAME));
        assert_eq!(
            extracted.defaults.get(keys::CONS_NAME).unwrap().as_text(),
            Some("张三")
        );
        assert!(!extracted.defaults.contains_key(keys::ELEC_ADDR));
    }

    #[test]
    fn test_select_daily_prefers_today() {
        let entries = vec![
            daily("20260413", Some(dec!(10))),
            daily("20260415", None),
            daily("20260414", Some(dec!(12))),
        ];
        let selected = select_daily_entry(&entries, day(2026, 4, 15)).unwrap();
        assert_eq!(selected.ymd.as_deref(), Some("20260415"));
    }

    #[test]
    fn test_select_daily_falls_back_to_last_reading() {
        let entries = vec![
            daily("20260412", Some(dec!(9))),
            daily("20260413", Some(dec!(42))),
            daily("20260414", None),
        ];
        let fields = monthly_daily_fields(&entries, day(2026, 4, 15))
            .unwrap()
            .fields;
        assert_eq!(
            fields.get(keys::TODAY_USAGE).unwrap().as_decimal(),
            Some(dec!(42))
        );
        assert_eq!(
            fields.get(keys::MONTH_ESTI_USAGE).unwrap().as_decimal(),
            Some(Decimal::ZERO)
        );
        assert_eq!(fields.get(keys::LAST_MR_DATE).unwrap().as_text(), Some(""));
    }

    #[test]
    fn test_empty_daily_list_still_succeeds() {
        let fields = monthly_daily_fields(&[], day(2026, 4, 15)).unwrap().fields;
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key(keys::DAILY_LIST));
    }

    #[test]
    fn test_tou_skips_null_values() {
        let fields = tou_fields(&TouPayload {
            total_pq: Some(dec!(5.2)),
            peak_pq: Some(dec!(2.1)),
            ..Default::default()
        })
        .unwrap()
        .fields;
        assert_eq!(fields.len(), 2);
        assert!(!fields.contains_key(keys::TODAY_VALLEY_PQ));
    }

    #[test]
    fn test_bill_fields_use_first_bill_and_detail() {
        let bills = vec![
            BillEntry {
                rcvbl_ym: Some("202603".to_string()),
                rcvbl_amt: Some(dec!(48.6)),
                t_pq: Some(dec!(102)),
                pay_detail_list: vec![PayDetail {
                    kwh_prc: Some(dec!(0.4770)),
                    prc_name: Some("居民合表电价".to_string()),
                }],
            },
            BillEntry {
                rcvbl_ym: Some("202602".to_string()),
                ..Default::default()
            },
        ];
        let fields = bill_fields(&bills).unwrap().fields;
        assert_eq!(fields.get(keys::LATEST_BILL_YM).unwrap().as_text(), Some("202603"));
        assert_eq!(
            fields.get(keys::UNIT_PRICE).unwrap().as_decimal(),
            Some(dec!(0.4770))
        );
        assert_eq!(
            fields.get(keys::PRICE_NAME).unwrap().as_text(),
            Some("居民合表电价")
        );
        assert!(fields.contains_key(keys::BILL_LIST));
    }

    #[test]
    fn test_bill_without_pay_details_omits_price() {
        let bills = vec![BillEntry {
            rcvbl_ym: Some("202603".to_string()),
            ..Default::default()
        }];
        let fields = bill_fields(&bills).unwrap().fields;
        assert!(!fields.contains_key(keys::UNIT_PRICE));
        assert_eq!(
            fields.get(keys::LATEST_BILL_AMT).unwrap().as_decimal(),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_empty_bill_list_is_logical_failure() {
        let err = bill_fields(&[]).unwrap_err();
        assert_eq!(err.kind(), powerwatch_source::FailureKind::Logical);
    }
}
