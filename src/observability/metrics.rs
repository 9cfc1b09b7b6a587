//! Metrics collection and exposition.
//!
//! # Metrics
//! - `supervisor_child_starts_total` (counter): spawns by child
//! - `supervisor_child_exits_total` (counter): exits by child and code
//! - `supervisor_backend_restarts_total` (counter): policy-driven respawns
//! - `supervisor_readiness_attempts` (gauge): probes used by the startup gate
//! - `supervisor_backend_healthy` (gauge): 1=healthy, 0=unhealthy
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_child_start(child: &'static str) {
    counter!("supervisor_child_starts_total", "child" => child).increment(1);
}

pub fn record_child_exit(child: &'static str, code: i32) {
    counter!(
        "supervisor_child_exits_total",
        "child" => child,
        "code" => code.to_string()
    )
    .increment(1);
}

pub fn record_backend_restart() {
    counter!("supervisor_backend_restarts_total").increment(1);
}

pub fn record_readiness_attempts(attempts: u32) {
    gauge!("supervisor_readiness_attempts").set(f64::from(attempts));
}

pub fn record_backend_health(healthy: bool) {
    gauge!("supervisor_backend_healthy").set(if healthy { 1.0 } else { 0.0 });
}
