// Scheduler binary entry point
//
// Loads the historical record, registers one calendar trigger per event,
// logs the trigger listing, then runs the background timing loop until
// interrupted.

use anyhow::Context;
use chrono_tz::Tz;
use common::config::Settings;
use common::dispatch::BenchmarkDispatcher;
use common::scheduler::{ReplayScheduler, SchedulerConfig};
use common::{inspector, loader, telemetry, trigger};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    settings.validate().map_err(anyhow::Error::msg)?;

    telemetry::init_logging(&settings.observability.log_level)?;
    telemetry::init_metrics(settings.observability.metrics_port)?;

    info!(
        history_path = %settings.replay.history_path,
        target_url = %settings.dispatch.target_url,
        "Starting traffic replay scheduler"
    );

    let timezone: Tz = settings
        .scheduler
        .timezone
        .parse()
        .map_err(|e: chrono_tz::ParseError| anyhow::anyhow!("Invalid timezone: {}", e))?;

    let dispatcher = Arc::new(BenchmarkDispatcher::new(settings.dispatch.clone()));
    let engine = Arc::new(ReplayScheduler::new(
        SchedulerConfig {
            tick_interval: Duration::from_secs(settings.scheduler.tick_interval_seconds),
            timezone,
        },
        dispatcher,
    ));

    // A single bad row forecloses all scheduling for this run: nothing is
    // registered and the timing loop never starts.
    let events = loader::load_events(&settings.replay.history_path).map_err(|e| {
        error!(error = %e, "Failed to load historical record");
        e
    })?;

    let ids = trigger::register_events(&engine, events).await?;
    info!(triggers = ids.len(), "Historical events registered");

    info!("Scheduled triggers:");
    for line in inspector::render_entries(&engine.entries().await).lines() {
        info!("{}", line);
    }

    engine.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Received Ctrl+C signal, initiating graceful shutdown");
    engine.stop().await;

    Ok(())
}
