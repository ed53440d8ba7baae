//! Metrics collection and exposition.
//!
//! # Metrics
//! - `model_service_registration_attempts_total` (counter): by outcome
//! - `model_service_heartbeat_probes_total` (counter): by outcome
//! - `model_service_parent_connected` (gauge): 1=registered, 0=not
//! - `model_service_predictions_total` (counter): by outcome
//!
//! Recording without an installed exporter is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

pub fn record_registration_attempt(success: bool) {
    metrics::counter!("model_service_registration_attempts_total", "outcome" => outcome(success))
        .increment(1);
}

pub fn record_heartbeat_probe(success: bool) {
    metrics::counter!("model_service_heartbeat_probes_total", "outcome" => outcome(success))
        .increment(1);
}

pub fn set_parent_connected(connected: bool) {
    metrics::gauge!("model_service_parent_connected").set(if connected { 1.0 } else { 0.0 });
}

/// `outcome` is one of "success", "not_ready", "bad_request", "error".
pub fn record_prediction(outcome: &'static str) {
    metrics::counter!("model_service_predictions_total", "outcome" => outcome).increment(1);
}
