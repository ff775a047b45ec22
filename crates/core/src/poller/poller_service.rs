//! Poll scheduler.
//!
//! Runs aggregator cycles on an interval or on demand, one at a time, and
//! publishes each resulting snapshot.
//!
//! # Architecture
//!
//! ```text
//! interval tick / trigger()
//!       │
//!       ├─► Mutex<Aggregator>::try_lock   (busy → Skipped)
//!       ├─► Aggregator::run_cycle         (Merged | StaleServed | Fatal)
//!       ├─► watch<Option<Arc<Snapshot>>>  (latest snapshot for readers)
//!       └─► SnapshotListener::on_snapshot (every registered listener)
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::listener::SnapshotListener;
use crate::aggregator::{Aggregator, CycleReport, CycleStatus};
use crate::errors::Result;
use crate::settings::PollConfig;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Idle,
    Polling,
}

/// Result of a manual or scheduled trigger.
#[derive(Debug, Clone)]
pub enum TriggerOutcome {
    Completed {
        status: CycleStatus,
        snapshot: Arc<Snapshot>,
    },
    /// A cycle was already in flight; this trigger was dropped.
    Skipped,
}

pub struct PollScheduler {
    aggregator: Mutex<Aggregator>,
    listeners: RwLock<Vec<Arc<dyn SnapshotListener>>>,
    latest: watch::Sender<Option<Arc<Snapshot>>>,
    config: watch::Sender<PollConfig>,
    last_report: RwLock<Option<CycleReport>>,
}

impl PollScheduler {
    pub fn new(aggregator: Aggregator, config: PollConfig) -> Self {
        let (latest, _) = watch::channel(None);
        let (config, _) = watch::channel(config);
        Self {
            aggregator: Mutex::new(aggregator),
            listeners: RwLock::new(Vec::new()),
            latest,
            config,
            last_report: RwLock::new(None),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn SnapshotListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn state(&self) -> PollState {
        match self.aggregator.try_lock() {
            Ok(_) => PollState::Idle,
            Err(_) => PollState::Polling,
        }
    }

    /// Most recently published snapshot, if any cycle has completed.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.latest.subscribe()
    }

    pub fn config(&self) -> PollConfig {
        *self.config.borrow()
    }

    /// Changes the poll interval. The running loop picks it up immediately.
    pub fn set_interval(&self, minutes: u32) -> Result<()> {
        let config = PollConfig::new(minutes)?;
        self.config.send_replace(config);
        info!("Poll interval set to {} minutes", minutes);
        Ok(())
    }

    pub fn last_report(&self) -> Option<CycleReport> {
        self.last_report
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs the first cycle, waiting for any cycle already in flight.
    ///
    /// Fails with [`crate::Error::FatalAggregation`] when no operation
    /// succeeds, so the host can refuse to start.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>> {
        let mut aggregator = self.aggregator.lock().await;
        let (_, snapshot) = self.run_locked(&mut aggregator).await?;
        Ok(snapshot)
    }

    /// Runs a cycle unless one is already in flight.
    pub async fn trigger(&self) -> Result<TriggerOutcome> {
        let Ok(mut aggregator) = self.aggregator.try_lock() else {
            debug!("Poll cycle already in flight, trigger dropped");
            return Ok(TriggerOutcome::Skipped);
        };
        let (status, snapshot) = self.run_locked(&mut aggregator).await?;
        Ok(TriggerOutcome::Completed { status, snapshot })
    }

    async fn run_locked(&self, aggregator: &mut Aggregator) -> Result<(CycleStatus, Arc<Snapshot>)> {
        let outcome = aggregator.run_cycle().await?;
        let snapshot = Arc::new(outcome.snapshot);
        *self
            .last_report
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(outcome.report);
        self.publish(snapshot.clone());
        Ok((outcome.status, snapshot))
    }

    fn publish(&self, snapshot: Arc<Snapshot>) {
        self.latest.send_replace(Some(snapshot.clone()));
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener.on_snapshot(&snapshot);
        }
    }

    /// Starts the interval loop. The first scheduled cycle runs one interval
    /// after start; call [`PollScheduler::first_refresh`] before spawning.
    ///
    /// The loop ends when `shutdown` flips or its sender is dropped. An
    /// in-flight cycle is abandoned without merging.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut config_rx = self.config.subscribe();
            info!(
                "Poll scheduler started ({} minute interval)",
                config_rx.borrow().interval_minutes()
            );

            loop {
                let period = config_rx.borrow_and_update().interval();
                tokio::select! {
                    _ = tokio::time::sleep(period) => {
                        tokio::select! {
                            result = self.trigger() => log_trigger(result),
                            _ = shutdown.changed() => break,
                        }
                    }
                    changed = config_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        debug!("Poll interval changed, rescheduling");
                    }
                    _ = shutdown.changed() => break,
                }
            }

            info!("Poll scheduler stopped");
        })
    }
}

fn log_trigger(result: Result<TriggerOutcome>) {
    match result {
        Ok(TriggerOutcome::Completed {
            status: CycleStatus::Merged,
            snapshot,
        }) => info!(
            "Scheduled poll merged, {} fields known",
            snapshot.fields().len()
        ),
        Ok(TriggerOutcome::Completed {
            status: CycleStatus::StaleServed,
            ..
        }) => warn!("Scheduled poll failed for every operation, serving cached data"),
        Ok(TriggerOutcome::Skipped) => debug!("Scheduled poll skipped"),
        Err(e) => error!("Scheduled poll failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::errors::Error;
    use crate::poller::MockSnapshotListener;
    use crate::snapshot::keys;
    use chrono::NaiveDate;
    use powerwatch_source::{
        AccountIds, FeesPayload, MockFailure, MockPowerSource, MockReply, SourceOperation,
    };
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn source() -> MockPowerSource {
        let source = MockPowerSource::new(AccountIds::new("1400123456", "14401"));
        source.set_fees(MockReply::ok(FeesPayload {
            prepay_bal: Some(dec!(50)),
            ..Default::default()
        }));
        source
    }

    fn scheduler(source: &MockPowerSource) -> Arc<PollScheduler> {
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2026, 4, 15)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        ));
        let aggregator = Aggregator::new(Arc::new(source.clone()))
            .with_clock(clock)
            .with_request_timeout(Duration::from_secs(15));
        Arc::new(PollScheduler::new(aggregator, PollConfig::default()))
    }

    #[tokio::test]
    async fn test_first_refresh_publishes_to_listeners() {
        let source = source();
        let scheduler = scheduler(&source);
        let listener = MockSnapshotListener::new();
        scheduler.add_listener(Arc::new(listener.clone()));

        let snapshot = scheduler.first_refresh().await.unwrap();
        assert_eq!(snapshot.decimal(keys::PREPAY_BAL), Some(dec!(50)));
        assert_eq!(listener.len(), 1);
        assert_eq!(scheduler.latest(), Some(snapshot));
        assert!(scheduler.last_report().unwrap().any_succeeded());
        assert_eq!(scheduler.state(), PollState::Idle);
    }

    #[tokio::test]
    async fn test_first_refresh_fails_when_nothing_succeeds() {
        let source = source();
        source.fail_all(MockFailure::Transport);
        let scheduler = scheduler(&source);
        let listener = MockSnapshotListener::new();
        scheduler.add_listener(Arc::new(listener.clone()));

        let err = scheduler.first_refresh().await.unwrap_err();
        assert!(matches!(err, Error::FatalAggregation { .. }));
        assert!(listener.is_empty());
        assert!(scheduler.latest().is_none());
    }

    #[tokio::test]
    async fn test_stale_cycle_is_published() {
        let source = source();
        let scheduler = scheduler(&source);
        let listener = MockSnapshotListener::new();
        scheduler.add_listener(Arc::new(listener.clone()));
        scheduler.first_refresh().await.unwrap();

        source.fail_all(MockFailure::HttpStatus(502));
        let outcome = scheduler.trigger().await.unwrap();
        match outcome {
            TriggerOutcome::Completed { status, snapshot } => {
                assert_eq!(status, CycleStatus::StaleServed);
                assert!(snapshot.is_using_cache());
                assert_eq!(snapshot.decimal(keys::PREPAY_BAL), Some(dec!(50)));
            }
            TriggerOutcome::Skipped => panic!("trigger should have run"),
        }
        assert_eq!(listener.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_trigger_is_dropped() {
        let source = source();
        source.hang_all();
        let scheduler = scheduler(&source);

        let running = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.trigger().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(scheduler.state(), PollState::Polling);

        let second = scheduler.trigger().await.unwrap();
        assert!(matches!(second, TriggerOutcome::Skipped));

        let first = running.await.unwrap();
        assert!(matches!(first, Err(Error::FatalAggregation { .. })));
        assert_eq!(source.calls(SourceOperation::Fees), 1);
        assert_eq!(scheduler.state(), PollState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_loop_polls_and_stops() {
        let source = source();
        let scheduler = scheduler(&source);
        scheduler.first_refresh().await.unwrap();
        scheduler.set_interval(10).unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = scheduler.clone().spawn(shutdown_rx);

        tokio::time::sleep(Duration::from_secs(10 * 60 + 1)).await;
        assert_eq!(source.calls(SourceOperation::Fees), 2);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[test]
    fn test_set_interval_rejects_out_of_range() {
        let scheduler = scheduler(&source());
        assert!(scheduler.set_interval(5).is_err());
        assert_eq!(scheduler.config().interval_minutes(), 60);
        scheduler.set_interval(30).unwrap();
        assert_eq!(scheduler.config().interval_minutes(), 30);
    }
}
