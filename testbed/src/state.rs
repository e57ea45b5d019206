use reqwest::Client;

/// Shared state for the testbed responder
#[derive(Clone)]
pub struct AppState {
    pub http: Client,
    /// URL queried by `/status/200` for the caller-visible IP address.
    pub ip_echo_url: String,
}
