//! Binary entrypoint: load configuration, open the datasets, serve.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use dilution_server::config::Config;
use dilution_server::{routes, AppState};
use dilution_store::{CustomDataset, DataSources, JsonTracerRegistry, ReferenceDataset};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load server configuration")?;

    info!(
        bind = %config.bind_addr,
        reference = %config.reference_path.display(),
        tracers = %config.tracer_path.display(),
        custom = %config.custom_path.display(),
        "Starting dilution-server"
    );

    let reference = ReferenceDataset::open(&config.reference_path).with_context(|| {
        format!(
            "Failed to load reference dataset at {}",
            config.reference_path.display()
        )
    })?;
    let custom = CustomDataset::open(&config.custom_path).with_context(|| {
        format!(
            "Failed to open custom dataset at {}",
            config.custom_path.display()
        )
    })?;
    let registry = JsonTracerRegistry::open(&config.tracer_path).with_context(|| {
        format!(
            "Failed to load tracer data at {}",
            config.tracer_path.display()
        )
    })?;

    let state = AppState {
        sources: Arc::new(DataSources::new(reference, custom)),
        registry: Arc::new(registry),
    };

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
