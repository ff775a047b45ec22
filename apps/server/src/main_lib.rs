use std::sync::Arc;

use anyhow::Context;
use chrono::Datelike;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use powerwatch_core::clock::{Clock, SystemClock};
use powerwatch_core::entities::YearlyEntityRegistry;
use powerwatch_core::settings::validate_account;
use powerwatch_core::{Aggregator, PollScheduler};
use powerwatch_source::{AccountIds, HttpPowerSource, PowerDataSource};

use crate::config::Config;

pub struct AppState {
    pub account: AccountIds,
    pub scheduler: Arc<PollScheduler>,
    pub yearly_registry: Arc<YearlyEntityRegistry>,
}

pub fn init_tracing() {
    let log_format = std::env::var("PW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let source = HttpPowerSource::with_config(
        config.account.clone(),
        config.base_url.clone(),
        config.source_timeout,
    );
    tracing::info!("Using platform at {}", config.base_url);
    build_state_with_source(config, Arc::new(source)).await
}

/// Validates the account, runs the first cycle and wires the listeners.
///
/// Fails when the account is rejected, the platform is unreachable, or the
/// first cycle yields no data at all.
pub async fn build_state_with_source(
    config: &Config,
    source: Arc<dyn PowerDataSource>,
) -> anyhow::Result<Arc<AppState>> {
    validate_account(source.as_ref())
        .await
        .context("Account validation failed")?;

    let account = source.account().clone();
    let aggregator = Aggregator::new(source).with_request_timeout(config.source_timeout);
    let scheduler = Arc::new(PollScheduler::new(aggregator, config.poll));

    let current_year = SystemClock.now().year();
    let yearly_registry = Arc::new(YearlyEntityRegistry::new(
        account.cons_no.clone(),
        current_year,
    ));
    scheduler.add_listener(yearly_registry.clone());

    let snapshot = scheduler
        .first_refresh()
        .await
        .context("First refresh returned no data")?;
    tracing::info!(
        "First refresh for account {} produced {} fields",
        account.cons_no,
        snapshot.fields().len()
    );

    Ok(Arc::new(AppState {
        account,
        scheduler,
        yearly_registry,
    }))
}
