//! Planetary server binary

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use planetary::api::{create_router, AppState};
use planetary::config::{AppConfig, LogFormat};
use planetary::storage::create_repository;
use planetary::swapi::SwapiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    config.validate().context("invalid configuration")?;

    let storage_config = config
        .storage_runtime()
        .context("invalid storage configuration")?;

    let repository = create_repository(storage_config)
        .await
        .context("failed to initialise planet storage")?;

    let swapi = SwapiClient::new(config.swapi.base_url.clone(), config.swapi.timeout())
        .context("failed to build film database client")?;
    tracing::info!(
        base_url = %swapi.base_url(),
        timeout_secs = config.swapi.timeout_secs,
        on_failure = ?config.swapi.on_failure,
        "Film database client ready",
    );

    let state = AppState::new(repository, Arc::new(swapi))
        .with_film_lookup(config.swapi.on_failure)
        .with_request_timeout(config.server.request_timeout());

    let router = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("planetary=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
