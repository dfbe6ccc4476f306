//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tenant_router_decisions_total` (counter): routing decisions by disposition, reason
//! - `tenant_router_requests_total` (counter): forwarded requests by method, status
//! - `tenant_router_request_duration_seconds` (histogram): end-to-end latency
//! - `tenant_router_config_reloads_total` (counter): reload attempts by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder.

use std::sync::OnceLock;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::routing::RoutingDecision;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Idempotent.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if let Some(handle) = PROMETHEUS.get() {
        return Some(handle.clone());
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(PROMETHEUS.get_or_init(|| handle).clone()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Handle of the installed recorder, if any.
pub fn handle() -> Option<PrometheusHandle> {
    PROMETHEUS.get().cloned()
}

pub fn record_decision(decision: &RoutingDecision) {
    counter!(
        "tenant_router_decisions_total",
        "disposition" => decision.label(),
        "reason" => decision.reason()
    )
    .increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "tenant_router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("tenant_router_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_reload(success: bool) {
    let outcome = if success { "applied" } else { "rejected" };
    counter!("tenant_router_config_reloads_total", "outcome" => outcome).increment(1);
}
