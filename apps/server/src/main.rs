use powerwatch_server::api::app_router;
use powerwatch_server::config::Config;
use powerwatch_server::scheduler::{shutdown_signal, start_poll_scheduler};
use powerwatch_server::{build_state, init_tracing};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let state = build_state(&config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = start_poll_scheduler(state.clone(), shutdown_rx);

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tx.send_replace(true);
    poller.await?;
    Ok(())
}
