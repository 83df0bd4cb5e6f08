//! Order Cache - order lookup service
//!
//! Consumes orders from a stream, persists them and serves them over HTTP
//! through a bounded LRU cache.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::api::{create_router, AppState};
use order_cache::config::{Config, IngestSource, StoreBackend};
use order_cache::ingest::{IngestReport, LineSource, OrderHandler};
use order_cache::storage::{MemoryStore, OrderStore, PgConfig, PgStore};
use order_cache::tasks::spawn_ingest_task;
use order_cache::CacheEngine;

/// Main entry point for the order service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Open the order store (and apply the schema for Postgres)
/// 4. Create the cache engine, which starts preloading in the background
/// 5. Start the ingestion task
/// 6. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order service");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    let capacity = config.capacity()?;
    let addr = config.addr()?;
    info!(
        addr = %addr,
        cache_capacity = capacity.get(),
        backend = %config.store_backend,
        "Configuration loaded"
    );

    let store = open_store(&config).await?;

    let cache = CacheEngine::new(capacity, Arc::clone(&store));
    info!("Cache engine initialized, preload running in background");

    let ingest_handle = start_ingestion(&config, Arc::clone(&store)).await?;

    let state = AppState::new(cache, store);
    let app = create_router(state, config.request_timeout());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(ingest_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn OrderStore>> {
    match config.backend()? {
        StoreBackend::Postgres => {
            let pg = PgConfig {
                url: config.database_url.clone(),
                max_size: config.db_pool_size,
                timeout: config.request_timeout(),
            };
            let store = PgStore::from_config(&pg).context("failed to create database pool")?;
            store.migrate().await.context("failed to apply schema")?;
            info!("Connected to PostgreSQL");
            let store: Arc<dyn OrderStore> = Arc::new(store);
            Ok(store)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory order store; orders are lost on restart");
            let store: Arc<dyn OrderStore> = Arc::new(MemoryStore::new());
            Ok(store)
        }
    }
}

async fn start_ingestion(
    config: &Config,
    store: Arc<dyn OrderStore>,
) -> anyhow::Result<Option<JoinHandle<IngestReport>>> {
    let handler = OrderHandler::new(store);

    let handle = match &config.ingest_source {
        IngestSource::None => {
            info!("Ingestion disabled");
            return Ok(None);
        }
        IngestSource::Stdin => {
            info!("Reading orders from stdin");
            spawn_ingest_task(LineSource::stdin(), handler)
        }
        IngestSource::File(path) => {
            let source = LineSource::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            info!(path = %path.display(), "Reading orders from file");
            spawn_ingest_task(source, handler)
        }
    };

    Ok(Some(handle))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the ingestion task and allows graceful shutdown.
async fn shutdown_signal(ingest_handle: Option<JoinHandle<IngestReport>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = ingest_handle {
        handle.abort();
        warn!("Ingestion task aborted");
    }
}
