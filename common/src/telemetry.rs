// Telemetry module for structured logging and metrics

use crate::models::TriggerId;
use anyhow::Result;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize structured logging with JSON formatting.
///
/// The level comes from `RUST_LOG` when set, otherwise from configuration.
pub fn init_logging(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_target(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(log_level = log_level, "Structured logging initialized");
    Ok(())
}

/// Initialize the Prometheus metrics exporter and describe the counters
/// the scheduler emits.
pub fn init_metrics(metrics_port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", metrics_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid metrics port: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_counter!(
        "trigger_fired_total",
        "Total number of trigger firings handed to dispatch"
    );
    describe_counter!(
        "load_run_success_total",
        "Total number of successful load-generation runs"
    );
    describe_counter!(
        "load_run_failed_total",
        "Total number of failed load-generation runs"
    );

    tracing::info!(
        metrics_port = metrics_port,
        "Prometheus metrics exporter initialized"
    );
    Ok(())
}

/// Record a trigger firing being handed to a dispatch worker
#[inline]
pub fn record_trigger_fired(trigger_id: TriggerId) {
    counter!("trigger_fired_total", "trigger_id" => trigger_id.to_string()).increment(1);
}

/// Record a successful load-generation run
#[inline]
pub fn record_load_run_success(trigger_id: TriggerId) {
    counter!("load_run_success_total", "trigger_id" => trigger_id.to_string()).increment(1);
}

/// Record a failed load-generation run
#[inline]
pub fn record_load_run_failure(trigger_id: TriggerId, reason: &'static str) {
    counter!(
        "load_run_failed_total",
        "trigger_id" => trigger_id.to_string(),
        "reason" => reason
    )
    .increment(1);
}
