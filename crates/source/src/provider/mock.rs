//! Scripted source for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::SourceError;
use crate::models::{
    AccountIds, AnnualRecordsPayload, BillEntry, ConsInfoPayload, DailyEntry, Envelope,
    FeesPayload, TouPayload, YearMonth,
};

use super::{PowerDataSource, SourceOperation};

/// Exchange-level failure a [`MockPowerSource`] can be scripted to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockFailure {
    Transport,
    Timeout,
    HttpStatus(u16),
    Malformed,
}

impl MockFailure {
    fn into_error(self, operation: SourceOperation) -> SourceError {
        match self {
            MockFailure::Transport => SourceError::Transport {
                operation,
                message: "connection refused".to_string(),
            },
            MockFailure::Timeout => SourceError::Timeout { operation },
            MockFailure::HttpStatus(status) => SourceError::HttpStatus { operation, status },
            MockFailure::Malformed => SourceError::Decode {
                operation,
                message: "expected value at line 1 column 1".to_string(),
            },
        }
    }
}

/// Scripted answer for one operation.
#[derive(Clone, Debug)]
pub enum MockReply<T> {
    Envelope(Envelope<T>),
    Fail(MockFailure),
    /// Never completes; only a caller-side timeout ends the call.
    Hang,
}

impl<T> MockReply<T> {
    pub fn ok(payload: T) -> Self {
        MockReply::Envelope(Envelope::success(payload))
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        MockReply::Envelope(Envelope::failure(Some(msg.into())))
    }

    pub fn fail(failure: MockFailure) -> Self {
        MockReply::Fail(failure)
    }
}

impl<T> Default for MockReply<T> {
    fn default() -> Self {
        MockReply::Fail(MockFailure::Transport)
    }
}

#[derive(Default)]
struct Script {
    fees: MockReply<FeesPayload>,
    annual_records: MockReply<AnnualRecordsPayload>,
    monthly_daily: MockReply<Vec<DailyEntry>>,
    daily_tou: MockReply<TouPayload>,
    yearly_bills: MockReply<Vec<BillEntry>>,
    cons_info: MockReply<ConsInfoPayload>,
}

/// Source whose answers are set per operation. Unscripted operations fail
/// with a transport error.
#[derive(Clone)]
pub struct MockPowerSource {
    account: AccountIds,
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<HashMap<SourceOperation, usize>>>,
}

impl MockPowerSource {
    pub fn new(account: AccountIds) -> Self {
        Self {
            account,
            script: Arc::new(Mutex::new(Script::default())),
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn set_fees(&self, reply: MockReply<FeesPayload>) {
        self.script.lock().unwrap().fees = reply;
    }

    pub fn set_annual_records(&self, reply: MockReply<AnnualRecordsPayload>) {
        self.script.lock().unwrap().annual_records = reply;
    }

    pub fn set_monthly_daily(&self, reply: MockReply<Vec<DailyEntry>>) {
        self.script.lock().unwrap().monthly_daily = reply;
    }

    pub fn set_daily_tou(&self, reply: MockReply<TouPayload>) {
        self.script.lock().unwrap().daily_tou = reply;
    }

    pub fn set_yearly_bills(&self, reply: MockReply<Vec<BillEntry>>) {
        self.script.lock().unwrap().yearly_bills = reply;
    }

    pub fn set_cons_info(&self, reply: MockReply<ConsInfoPayload>) {
        self.script.lock().unwrap().cons_info = reply;
    }

    /// Scripts every polled operation with the same failure.
    pub fn fail_all(&self, failure: MockFailure) {
        let mut script = self.script.lock().unwrap();
        script.fees = MockReply::Fail(failure);
        script.annual_records = MockReply::Fail(failure);
        script.monthly_daily = MockReply::Fail(failure);
        script.daily_tou = MockReply::Fail(failure);
        script.yearly_bills = MockReply::Fail(failure);
    }

    /// Makes every polled operation hang.
    pub fn hang_all(&self) {
        let mut script = self.script.lock().unwrap();
        script.fees = MockReply::Hang;
        script.annual_records = MockReply::Hang;
        script.monthly_daily = MockReply::Hang;
        script.daily_tou = MockReply::Hang;
        script.yearly_bills = MockReply::Hang;
    }

    /// Number of times `operation` was called.
    pub fn calls(&self, operation: SourceOperation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, operation: SourceOperation) {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
    }

    async fn answer<T>(
        &self,
        operation: SourceOperation,
        pick: impl FnOnce(&Script) -> MockReply<T>,
    ) -> Result<Envelope<T>, SourceError> {
        self.record(operation);
        let reply = {
            let script = self.script.lock().unwrap();
            pick(&script)
        };
        match reply {
            MockReply::Envelope(envelope) => Ok(envelope),
            MockReply::Fail(failure) => Err(failure.into_error(operation)),
            MockReply::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl PowerDataSource for MockPowerSource {
    fn account(&self) -> &AccountIds {
        &self.account
    }

    async fn fees(&self) -> Result<Envelope<FeesPayload>, SourceError> {
        self.answer(SourceOperation::Fees, |s| s.fees.clone()).await
    }

    async fn annual_records(
        &self,
        _year: i32,
    ) -> Result<Envelope<AnnualRecordsPayload>, SourceError> {
        self.answer(SourceOperation::AnnualRecords, |s| s.annual_records.clone())
            .await
    }

    async fn monthly_daily(
        &self,
        _month: YearMonth,
    ) -> Result<Envelope<Vec<DailyEntry>>, SourceError> {
        self.answer(SourceOperation::MonthlyDaily, |s| s.monthly_daily.clone())
            .await
    }

    async fn daily_tou(&self, _day: NaiveDate) -> Result<Envelope<TouPayload>, SourceError> {
        self.answer(SourceOperation::DailyTou, |s| s.daily_tou.clone())
            .await
    }

    async fn yearly_bills(&self, _year: i32) -> Result<Envelope<Vec<BillEntry>>, SourceError> {
        self.answer(SourceOperation::YearlyBills, |s| s.yearly_bills.clone())
            .await
    }

    async fn cons_info(&self) -> Result<Envelope<ConsInfoPayload>, SourceError> {
        self.answer(SourceOperation::ConsInfo, |s| s.cons_info.clone())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use rust_decimal_macros::dec;

    fn source() -> MockPowerSource {
        MockPowerSource::new(AccountIds::new("1400123456", "14401"))
    }

    #[tokio::test]
    async fn test_unscripted_operation_fails_with_transport_error() {
        let err = source().fees().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[tokio::test]
    async fn test_scripted_reply_and_call_count() {
        let source = source();
        source.set_fees(MockReply::ok(FeesPayload {
            prepay_bal: Some(dec!(12.5)),
            ..Default::default()
        }));

        let envelope = source.fees().await.unwrap();
        assert_eq!(envelope.data.unwrap().prepay_bal, Some(dec!(12.5)));
        source.fees().await.unwrap();
        assert_eq!(source.calls(SourceOperation::Fees), 2);
        assert_eq!(source.calls(SourceOperation::DailyTou), 0);
    }

    #[tokio::test]
    async fn test_validate_connection_follows_flag() {
        let source = source();
        source.set_cons_info(MockReply::rejected("户号不存在"));
        assert!(!source.validate_connection().await.unwrap());

        source.set_cons_info(MockReply::ok(ConsInfoPayload::default()));
        assert!(source.validate_connection().await.unwrap());

        source.set_cons_info(MockReply::fail(MockFailure::Transport));
        assert!(source.validate_connection().await.is_err());
    }
}
