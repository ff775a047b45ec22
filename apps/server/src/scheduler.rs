//! Background poll loop for the server.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::main_lib::AppState;

/// Starts the interval poll loop. It stops once `shutdown` flips to true.
pub fn start_poll_scheduler(
    state: Arc<AppState>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    info!(
        "Polling account {} every {} minutes",
        state.account.cons_no,
        state.scheduler.config().interval_minutes()
    );
    state.scheduler.clone().spawn(shutdown)
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
