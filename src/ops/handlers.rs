use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ops::OpsState;
use crate::routing::Resolution;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub environment: String,
    pub upstream: String,
    pub reserved_segments: usize,
    pub public_paths: usize,
    pub personal_routes: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

pub async fn get_status(State(state): State<OpsState>) -> Json<SystemStatus> {
    let engine = state.engine.load();
    let (reserved, public, personal) = engine.router().tables().sizes();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        environment: engine.environment().as_str().to_string(),
        upstream: state.upstream.to_string(),
        reserved_segments: reserved,
        public_paths: public,
        personal_routes: personal,
    })
}

pub async fn get_resolve(
    State(state): State<OpsState>,
    Query(query): Query<ResolveQuery>,
) -> Json<Resolution> {
    Json(state.engine.load().explain(&query.path))
}

pub async fn get_metrics(State(state): State<OpsState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}
