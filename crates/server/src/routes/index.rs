//! Browser rendering shell.

use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};
use signal_view_core::ClientConfig;

use crate::state::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");

/// Fill the shell's poll interval and window size placeholders.
pub fn render_index(client: &ClientConfig) -> String {
    INDEX_TEMPLATE
        .replace("__POLL_MS__", &client.poll_interval_ms.to_string())
        .replace("__MAX_WINDOW__", &client.max_window.to_string())
}

/// GET / - HTML page that polls `/data` and plots the live signal.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(&state.client))
}

/// Create the index routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}
