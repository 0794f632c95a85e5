//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dashboard_rpc_requests_total` (counter): JSON-RPC calls by method, outcome
//! - `dashboard_ledger_health` (gauge): 1=healthy, 0=unhealthy
//! - `dashboard_poll_cycles_total` (counter): poll cycles by outcome
//! - `dashboard_active_pollers` (gauge): running poll tasks (0 or 1)
//! - `dashboard_airdrop_requests_total` (counter): airdrops by outcome
//! - `dashboard_balance_lamports` (gauge): last fetched balance

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| e.to_string())?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_rpc(method: &str, outcome: &'static str) {
    ::metrics::counter!(
        "dashboard_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_ledger_health(healthy: bool) {
    ::metrics::gauge!("dashboard_ledger_health").set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_poll(outcome: &'static str) {
    ::metrics::counter!("dashboard_poll_cycles_total", "outcome" => outcome).increment(1);
}

pub fn set_active_pollers(count: usize) {
    ::metrics::gauge!("dashboard_active_pollers").set(count as f64);
}

pub fn record_airdrop(outcome: &'static str) {
    ::metrics::counter!("dashboard_airdrop_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_balance(lamports: u64) {
    ::metrics::gauge!("dashboard_balance_lamports").set(lamports as f64);
}
