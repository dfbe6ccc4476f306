//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding fallback
//! - Wire up middleware (request ID, tracing, limits, timeout, tenant routing)
//! - Forward requests to the upstream application
//! - Swap in new routing engines on config reload
//!
//! Layer order, outermost first:
//! set request id → propagate request id → trace → timeout → concurrency
//! limit → tenant routing → forward

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::InvalidHeaderName, HeaderName, Request, Version},
    middleware,
    response::Response,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc, Semaphore};
use tokio::task::JoinHandle;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::headers::prepare_forwarded;
use crate::http::middleware::{concurrency_limit_middleware, tenant_routing_middleware, SharedEngine};
use crate::http::request::{RequestIdExt, UpstreamTarget, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::RoutingEngine;

/// Error building the server from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("upstream.url {0:?} is not an absolute URL")]
    InvalidUpstream(String),

    #[error("invalid tenant header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: SharedEngine,
    pub client: Client<HttpConnector, Body>,
    pub upstream: Arc<UpstreamTarget>,
}

/// HTTP edge server for the tenant router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    engine: SharedEngine,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Result<Self, ServerError> {
        let engine: SharedEngine = Arc::new(ArcSwap::from_pointee(RoutingEngine::from_config(&config)?));
        let upstream = UpstreamTarget::parse(&config.upstream.url)
            .ok_or_else(|| ServerError::InvalidUpstream(config.upstream.url.clone()))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            engine: engine.clone(),
            client,
            upstream: Arc::new(upstream),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            engine,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);
        let permits = Arc::new(Semaphore::new(config.listener.max_connections));

        Router::new()
            .fallback(forward_handler)
            .layer(middleware::from_fn_with_state(state.engine.clone(), tenant_routing_middleware))
            .layer(middleware::from_fn_with_state(permits, concurrency_limit_middleware))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The live routing engine handle.
    pub fn engine(&self) -> SharedEngine {
        self.engine.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            environment = self.config.tenancy.environment.as_str(),
            "HTTP server starting"
        );

        let reloader = spawn_reloader(self.engine.clone(), self.config.clone(), config_updates);

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Apply routing changes from new configs. Listener, upstream and timeout
/// changes need a restart and are only reported.
fn spawn_reloader(
    engine: SharedEngine,
    mut current: RouterConfig,
    mut updates: mpsc::UnboundedReceiver<RouterConfig>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(next) = updates.recv().await {
            if next.listener != current.listener
                || next.upstream.url != current.upstream.url
                || next.timeouts != current.timeouts
            {
                tracing::warn!("Listener, upstream or timeout changes require a restart; applying routing rules only");
            }

            match RoutingEngine::from_config(&next) {
                Ok(new_engine) => {
                    engine.store(Arc::new(new_engine));
                    metrics::record_reload(true);
                    tracing::info!(
                        environment = next.tenancy.environment.as_str(),
                        personal_routes = next.tenancy.personal_routes.len(),
                        reserved_segments = next.tenancy.reserved_segments.len(),
                        "Routing rules reloaded"
                    );
                    current = next;
                }
                Err(e) => {
                    metrics::record_reload(false);
                    tracing::error!(error = %e, "Rejected config update; keeping current routing rules");
                }
            }
        }
    })
}

/// Forward the (possibly rewritten) request to the upstream application.
async fn forward_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = req.request_id().to_string();
    let method = req.method().to_string();

    let (mut parts, body) = req.into_parts();
    let client_ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    parts.uri = match state.upstream.uri_for(&parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Cannot build upstream URI");
            metrics::record_request(&method, 502, start_time);
            return response::bad_gateway();
        }
    };
    parts.version = Version::HTTP_11;
    prepare_forwarded(&mut parts.headers, client_ip);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %parts.uri,
        "Forwarding request"
    );

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(upstream_response) => {
            metrics::record_request(&method, upstream_response.status().as_u16(), start_time);
            response::from_upstream(upstream_response)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %state.upstream.authority(),
                error = %e,
                "Upstream error"
            );
            metrics::record_request(&method, 502, start_time);
            response::bad_gateway()
        }
    }
}
