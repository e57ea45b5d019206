// Request handlers for the testbed responder
//
// These endpoints are deliberately static: the replay scheduler only needs
// a target that answers with predictable statuses. The one moving part is
// the outbound IP lookup on the 200 handler.

use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

/// Fixed 200 responder; includes the caller-visible IP when the outbound
/// lookup succeeds. A failed lookup is logged and the status stays 200.
#[tracing::instrument(skip(state))]
pub async fn status_ok(State(state): State<AppState>) -> impl IntoResponse {
    let body = match lookup_ip(&state).await {
        Ok(ip) => format!("Status 200 - OK\nIP Address: {}\n", ip.trim()),
        Err(e) => {
            warn!(error = %e, "IP lookup failed");
            "Status 200 - OK\n".to_string()
        }
    };
    (StatusCode::OK, body)
}

async fn lookup_ip(state: &AppState) -> Result<String, reqwest::Error> {
    state
        .http
        .get(&state.ip_echo_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

pub async fn status_bad_request() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, "Status 400 - Bad Request\n")
}

pub async fn status_server_error() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Status 500 - Internal Server Error\n",
    )
}

/// Memory-allocation diagnostic: allocates the requested number of
/// megabytes for the duration of the request.
#[tracing::instrument]
pub async fn consume_memory(Path(megabytes): Path<String>) -> impl IntoResponse {
    let megabytes: usize = match megabytes.parse() {
        Ok(mb) => mb,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                "Invalid number of megabytes".to_string(),
            )
        }
    };

    let data = vec![0u8; megabytes * 1024 * 1024];
    (
        StatusCode::OK,
        format!("Allocated {} MB of memory", data.len() / (1024 * 1024)),
    )
}
