//! Global in-flight request limit.
//! Requests beyond the limit wait for a permit; the timeout layer bounds the wait.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Semaphore;

pub async fn concurrency_limit_middleware(
    State(permits): State<Arc<Semaphore>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return (StatusCode::SERVICE_UNAVAILABLE, "Server shutting down").into_response(),
    };
    next.run(req).await
}
