// Testbed responder entry point
//
// Serves the static target endpoints the generated load is aimed at.

use anyhow::{Context, Result};
use common::config::Settings;
use common::telemetry;
use std::net::SocketAddr;
use tracing::info;

mod handlers;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    settings.validate().map_err(anyhow::Error::msg)?;

    telemetry::init_logging(&settings.observability.log_level)?;

    let state = AppState {
        http: reqwest::Client::new(),
        ip_echo_url: settings.server.ip_echo_url.clone(),
    };
    let app = routes::build_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid listener address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    info!(%addr, "Testbed responder listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl+C signal, shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
