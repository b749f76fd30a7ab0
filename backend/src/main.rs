//! Backend entry-point: wires the record store, user cache, and explorer.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use memo_backend::ExplorerSettings;
use memo_backend::domain::{Explorer, Store};
use memo_backend::outbound::memo_source::HttpMemoSource;
use memo_backend::outbound::persistence::InMemoryRecordStore;

/// Application bootstrap.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ExplorerSettings::load().wrap_err("failed to load explorer settings")?;
    let source = HttpMemoSource::new(settings.request_timeout())
        .wrap_err("failed to build remote memo client")?;
    let store = Arc::new(Store::new(Arc::new(InMemoryRecordStore::default())));
    let explorer = Arc::new(Explorer::with_config(
        store,
        Arc::new(source),
        settings.explorer_config(),
    ));

    let cancel = CancellationToken::new();
    let worker = tokio::spawn({
        let explorer = Arc::clone(&explorer);
        let cancel = cancel.clone();
        async move { explorer.run(cancel).await }
    });

    tokio::signal::ctrl_c()
        .await
        .wrap_err("failed to listen for shutdown signal")?;
    info!("shutdown signal received");
    cancel.cancel();
    worker.await.wrap_err("explorer task panicked")?;
    Ok(())
}
