//! Metrics collection and exposition.
//!
//! # Metrics
//! - `routing_refresh_total` (counter): refresh cycles by outcome
//! - `routing_rules_cached` (gauge): rules in the cache after the last refresh
//! - `routing_parse_failures_total` (counter): skipped properties by kind (key, value)
//! - `routing_lookup_total` (counter): lookups by outcome
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests need no setup.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_refresh(outcome: &'static str) {
    ::metrics::counter!("routing_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_rules_cached(count: usize) {
    ::metrics::gauge!("routing_rules_cached").set(count as f64);
}

pub fn record_parse_failure(kind: &'static str) {
    ::metrics::counter!("routing_parse_failures_total", "kind" => kind).increment(1);
}

pub fn record_lookup(outcome: &'static str) {
    ::metrics::counter!("routing_lookup_total", "outcome" => outcome).increment(1);
}
