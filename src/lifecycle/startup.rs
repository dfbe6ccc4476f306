//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Start the config watcher and the ops listener
//! - Bind the edge listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)
//! - Shutdown waits at most one request timeout for in-flight requests

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::loader::{load_or_default, ConfigError};
use crate::config::watcher::ConfigWatcher;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::ops::{self, OpsState};

/// Fatal error during startup or serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("server: {0}")]
    Server(#[from] ServerError),

    #[error("config watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Run the tenant router until SIGINT/SIGTERM.
pub async fn run(config_path: Option<PathBuf>) -> Result<(), StartupError> {
    let config = load_or_default(config_path.as_deref())?;
    logging::init(&config.observability.log_level)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tenant-router starting");
    tracing::info!(
        config = ?config_path,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        environment = config.tenancy.environment.as_str(),
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        metrics::init_metrics()
    } else {
        None
    };

    // Keep the watcher handle alive for the lifetime of the server.
    let (config_updates, _watcher) = match &config_path {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (rx, Some(watcher.run()?))
        }
        None => {
            let (_, rx) = mpsc::unbounded_channel();
            (rx, None)
        }
    };

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.clone())?;

    if config.ops.enabled {
        let ops_listener = TcpListener::bind(&config.ops.bind_address).await?;
        let router = ops::setup_ops_router(OpsState {
            engine: server.engine(),
            api_key: Arc::from(config.ops.api_key.as_str()),
            upstream: Arc::from(config.upstream.url.as_str()),
            metrics: metrics_handle,
        });
        let ops_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = ops::serve(ops_listener, router, ops_shutdown).await {
                tracing::error!(error = %e, "Ops API stopped");
            }
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let mut server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => return Ok(result??),
        _ = signals::shutdown_signal() => {}
    }

    shutdown.trigger();
    let drain = Duration::from_secs(config.timeouts.request_secs);
    match tokio::time::timeout(drain, server_task).await {
        Ok(result) => result??,
        Err(_) => tracing::warn!(drain_secs = drain.as_secs(), "In-flight requests did not drain in time"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
