use crate::handlers;
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the responder router with all target endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/status/200", get(handlers::status_ok))
        .route("/status/400", get(handlers::status_bad_request))
        .route("/status/500", get(handlers::status_server_error))
        .route("/consume-memory/:megabytes", get(handlers::consume_memory))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
