//! HTTP implementation of [`PowerDataSource`].
//!
//! Every endpoint is a plain `GET` with query parameters returning a
//! `{flag, data}` JSON envelope. The server does not always send a JSON
//! content type, so bodies are read as text and parsed explicitly.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::SourceError;
use crate::models::{
    AccountIds, AnnualRecordsPayload, BillEntry, ConsInfoPayload, DailyEntry, Envelope,
    FeesPayload, TouPayload, YearMonth,
};

use super::{PowerDataSource, SourceOperation};

/// Base URL of the utility's web platform.
pub const DEFAULT_BASE_URL: &str = "http://ddwxyw.sxgjdl.com/wechart-platform-web";

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// The platform only answers requests that look like its own web client.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";

type Query = Vec<(&'static str, String)>;

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        "X-Requested-With",
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json;charset=UTF-8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));

    Client::builder()
        .default_headers(headers)
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Envelope as it arrives, before the payload is decoded.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    flag: bool,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default, alias = "message")]
    msg: serde_json::Value,
}

/// reqwest-backed source for one account.
///
/// # Example
///
/// ```ignore
/// use powerwatch_source::{AccountIds, HttpPowerSource};
///
/// let source = HttpPowerSource::new(AccountIds::new("1234567890", "14401"));
/// ```
pub struct HttpPowerSource {
    client: Client,
    base_url: String,
    account: AccountIds,
}

impl HttpPowerSource {
    /// Create a source against the public platform with the default timeout.
    pub fn new(account: AccountIds) -> Self {
        Self::with_config(account, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a source with a custom base URL and per-request timeout.
    ///
    /// Falls back to a bare client (no browser headers, no timeout) if the
    /// configured one cannot be built.
    pub fn with_config(account: AccountIds, base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = build_client(timeout).unwrap_or_else(|e| {
            warn!(
                "Failed to build HTTP client ({}), using defaults without timeout or headers",
                e
            );
            Client::new()
        });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account,
        }
    }

    fn url(&self, operation: SourceOperation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    fn fees_query(&self) -> Query {
        let mut query = vec![("consNo", self.account.cons_no.clone())];
        if let Some(open_id) = &self.account.open_id {
            query.push(("openId", open_id.clone()));
        }
        query
    }

    fn annual_records_query(&self, year: i32) -> Query {
        vec![
            ("consNo", self.account.cons_no.clone()),
            ("orgNo", self.account.org_no.clone()),
            ("year", year.to_string()),
        ]
    }

    fn monthly_daily_query(&self, month: YearMonth) -> Query {
        vec![
            ("consNo", self.account.cons_no.clone()),
            ("date", month.to_string()),
        ]
    }

    fn daily_tou_query(&self, day: NaiveDate) -> Query {
        vec![
            ("consNo", self.account.cons_no.clone()),
            ("date", day.format("%Y%m%d").to_string()),
        ]
    }

    fn yearly_bills_query(&self, year: i32) -> Query {
        vec![
            ("consNo", self.account.cons_no.clone()),
            ("orgNo", self.account.org_no.clone()),
            ("bgnYm", YearMonth::new(year, 1).to_string()),
            ("endYm", YearMonth::new(year, 12).to_string()),
        ]
    }

    fn cons_info_query(&self) -> Query {
        vec![("consNo", self.account.cons_no.clone())]
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        operation: SourceOperation,
        query: Query,
    ) -> Result<Envelope<T>, SourceError> {
        let response = self
            .client
            .get(self.url(operation))
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                operation,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(operation, e))?;
        debug!(
            "GET {} params={:?} -> {} bytes",
            operation.path(),
            query,
            body.len()
        );

        decode_envelope(operation, &body)
    }
}

/// Parses a response body into a typed envelope.
///
/// The payload is only decoded when `flag=true`; failure envelopes often
/// carry placeholder data of the wrong shape.
fn decode_envelope<T: DeserializeOwned>(
    operation: SourceOperation,
    body: &str,
) -> Result<Envelope<T>, SourceError> {
    let raw: RawEnvelope = serde_json::from_str(body).map_err(|e| SourceError::Decode {
        operation,
        message: e.to_string(),
    })?;

    let msg = match raw.msg {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    };

    if !raw.flag {
        return Ok(Envelope::failure(msg));
    }

    let data = if raw.data.is_null() {
        None
    } else {
        Some(
            serde_json::from_value(raw.data).map_err(|e| SourceError::Decode {
                operation,
                message: e.to_string(),
            })?,
        )
    };

    Ok(Envelope {
        flag: true,
        data,
        msg,
    })
}

#[async_trait]
impl PowerDataSource for HttpPowerSource {
    fn account(&self) -> &AccountIds {
        &self.account
    }

    async fn fees(&self) -> Result<Envelope<FeesPayload>, SourceError> {
        self.get_envelope(SourceOperation::Fees, self.fees_query())
            .await
    }

    async fn annual_records(
        &self,
        year: i32,
    ) -> Result<Envelope<AnnualRecordsPayload>, SourceError> {
        self.get_envelope(
            SourceOperation::AnnualRecords,
            self.annual_records_query(year),
        )
        .await
    }

    async fn monthly_daily(
        &self,
        month: YearMonth,
    ) -> Result<Envelope<Vec<DailyEntry>>, SourceError> {
        self.get_envelope(
            SourceOperation::MonthlyDaily,
            self.monthly_daily_query(month),
        )
        .await
    }

    async fn daily_tou(&self, day: NaiveDate) -> Result<Envelope<TouPayload>, SourceError> {
        self.get_envelope(SourceOperation::DailyTou, self.daily_tou_query(day))
            .await
    }

    async fn yearly_bills(&self, year: i32) -> Result<Envelope<Vec<BillEntry>>, SourceError> {
        self.get_envelope(SourceOperation::YearlyBills, self.yearly_bills_query(year))
            .await
    }

    async fn cons_info(&self) -> Result<Envelope<ConsInfoPayload>, SourceError> {
        self.get_envelope(SourceOperation::ConsInfo, self.cons_info_query())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use rust_decimal_macros::dec;

    fn source() -> HttpPowerSource {
        HttpPowerSource::new(AccountIds::new("1400123456", "14401"))
    }

    #[test]
    fn test_configured_client_builds() {
        assert!(build_client(DEFAULT_REQUEST_TIMEOUT).is_ok());
        assert!(build_client(Duration::from_millis(250)).is_ok());
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let source = HttpPowerSource::with_config(
            AccountIds::new("1", "2"),
            "http://localhost:9000/platform/",
            Duration::from_secs(1),
        );
        assert_eq!(
            source.url(SourceOperation::DailyTou),
            "http://localhost:9000/platform/getDaysOnlyData"
        );
    }

    #[test]
    fn test_fees_query_includes_open_id_only_when_set() {
        assert_eq!(
            source().fees_query(),
            vec![("consNo", "1400123456".to_string())]
        );

        let source = HttpPowerSource::new(
            AccountIds::new("1400123456", "14401").with_open_id("oAbC"),
        );
        assert_eq!(
            source.fees_query(),
            vec![
                ("consNo", "1400123456".to_string()),
                ("openId", "oAbC".to_string())
            ]
        );
    }

    #[test]
    fn test_period_queries() {
        let source = source();
        assert_eq!(
            source.yearly_bills_query(2026),
            vec![
                ("consNo", "1400123456".to_string()),
                ("orgNo", "14401".to_string()),
                ("bgnYm", "202601".to_string()),
                ("endYm", "202612".to_string()),
            ]
        );
        assert_eq!(
            source.monthly_daily_query(YearMonth::new(2026, 3))[1],
            ("date", "202603".to_string())
        );
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            source.daily_tou_query(day)[1],
            ("date", "20260309".to_string())
        );
        assert_eq!(
            source.annual_records_query(2026)[2],
            ("year", "2026".to_string())
        );
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = r#"{"flag": true, "data": {"prepayBal": "88.20", "consName": "张三"}}"#;
        let envelope: Envelope<FeesPayload> =
            decode_envelope(SourceOperation::Fees, body).unwrap();
        let fees = envelope.into_payload(SourceOperation::Fees).unwrap();
        assert_eq!(fees.prepay_bal, Some(dec!(88.20)));
        assert_eq!(fees.cons_name.as_deref(), Some("张三"));
    }

    #[test]
    fn test_decode_failure_envelope_ignores_payload_shape() {
        let body = r#"{"flag": false, "data": "", "msg": "系统维护"}"#;
        let envelope: Envelope<Vec<BillEntry>> =
            decode_envelope(SourceOperation::YearlyBills, body).unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.msg.as_deref(), Some("系统维护"));
    }

    #[test]
    fn test_decode_malformed_body_is_protocol_error() {
        let err = decode_envelope::<FeesPayload>(SourceOperation::Fees, "<html>502</html>")
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Protocol);
        assert_eq!(err.operation(), SourceOperation::Fees);
    }

    #[test]
    fn test_decode_wrong_payload_shape_is_protocol_error() {
        let body = r#"{"flag": true, "data": {"not": "a list"}}"#;
        let err = decode_envelope::<Vec<DailyEntry>>(SourceOperation::MonthlyDaily, body)
            .unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }

    #[test]
    fn test_decode_null_data_on_success() {
        let body = r#"{"flag": true, "data": null}"#;
        let envelope: Envelope<TouPayload> =
            decode_envelope(SourceOperation::DailyTou, body).unwrap();
        assert!(envelope.is_success());
        assert!(envelope.data.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let source = HttpPowerSource::with_config(
            AccountIds::new("1", "2"),
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        );
        let err = source.fees().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
    }
}
