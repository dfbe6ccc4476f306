//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{body::Body, http::Request, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use tenant_router::config::RouterConfig;
use tenant_router::http::HttpServer;
use tenant_router::lifecycle::Shutdown;

/// Start an upstream that answers every request with the path, query and
/// tenant header it received.
pub async fn start_echo_backend() -> SocketAddr {
    start_slow_echo_backend(Duration::ZERO).await
}

/// Like [`start_echo_backend`], but each response is held for `delay`.
pub async fn start_slow_echo_backend(delay: Duration) -> SocketAddr {
    let echo = move |req: Request<Body>| async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json::<Value>(json!({
            "path": req.uri().path(),
            "query": req.uri().query(),
            "tenant": header("x-tenant-slug"),
            "forwarded_host": header("x-forwarded-host"),
            "forwarded_for": header("x-forwarded-for"),
            "request_id": header("x-request-id"),
        }))
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, Router::new().fallback(echo)).await;
    });
    addr
}

/// A router running on an ephemeral port.
pub struct RunningRouter {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl RunningRouter {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the tenant router in front of `upstream`. `configure` tweaks the
/// config before the server is built.
pub async fn start_router(upstream: SocketAddr, configure: impl FnOnce(&mut RouterConfig)) -> RunningRouter {
    let mut config = RouterConfig::default();
    config.upstream.url = format!("http://{upstream}");
    configure(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).expect("valid config");

    let shutdown = Shutdown::new();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let server_shutdown: broadcast::Receiver<()> = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, config_rx, server_shutdown).await;
    });

    RunningRouter {
        addr,
        shutdown,
        config_tx,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
