//! Operations API.
//!
//! Served on its own listener so none of its paths compete with tenant
//! slugs. Every route requires `Authorization: Bearer <ops.api_key>`.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::http::middleware::SharedEngine;
use self::auth::ops_auth_middleware;
use self::handlers::*;

/// State shared by ops handlers.
#[derive(Clone)]
pub struct OpsState {
    pub engine: SharedEngine,
    pub api_key: Arc<str>,
    pub upstream: Arc<str>,
    pub metrics: Option<PrometheusHandle>,
}

pub fn setup_ops_router(state: OpsState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/resolve", get(get_resolve))
        .route("/metrics", get(get_metrics))
        .layer(middleware::from_fn_with_state(state.clone(), ops_auth_middleware))
        .with_state(state)
}

/// Serve the ops router until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    tracing::info!(address = %listener.local_addr()?, "Ops API listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}
