//! fx-quotes server binary.

use anyhow::{Context, Result};
use fx_quotes::api::rest::{create_router, AppState};
use fx_quotes::config::AppConfig;
use fx_quotes::infrastructure::sources::shared_client::{HttpResource, SharedHttpResource};
use fx_quotes::telemetry;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to read .env");
        }
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.log).context("Failed to initialize tracing")?;

    let resource: Arc<dyn HttpResource> =
        Arc::new(SharedHttpResource::new(config.sources.max_timeout_ms()));
    let engine = Arc::new(config.build_engine(&resource));

    info!(
        sources = engine.source_ids().len(),
        max_attempts = engine.retry_policy().config().max_attempts(),
        cache_ttl_secs = config.aggregation.cache_ttl_secs,
        "engine ready"
    );

    let router = create_router(AppState::new(engine, Arc::clone(&resource)));
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(%address, "fx-quotes listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    resource.release();
    info!("fx-quotes stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
