//! Route handlers for the signal-view server.

pub mod data;
pub mod health;
pub mod index;
pub mod metrics;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined router.
///
/// Routes:
/// - GET / - Browser rendering shell
/// - GET /data - Current file's full sequence and name
/// - GET /api/health - Health check
/// - GET /metrics - Prometheus metrics
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(index::router())
        .merge(data::router())
        .nest("/api", health::router())
        .merge(metrics::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_view_core::{ClientConfig, SourceConfig};

    #[tokio::test]
    async fn test_api_routes_creation() {
        let state = AppState::new(SourceConfig::default(), ClientConfig::default());
        let _router = api_routes(state);
    }
}
