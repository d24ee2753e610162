mod access_log;
mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod spanner;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use config::{Config, StorageConfig};
use spanner::SpannerClient;
use state::AppState;
use std::sync::Arc;
use store::{ContactStore, MemoryStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("phonebook_api=info,access_log=info,tower_http=info")),
        )
        .init();

    tracing::info!("phonebook-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn ContactStore> = match &config.storage {
        StorageConfig::Spanner(spanner) => Arc::new(SpannerClient::from_config(spanner).await?),
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
    };

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        store,
        config: Arc::new(config),
    };
    let app = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("phonebook-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
