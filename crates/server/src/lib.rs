// crates/server/src/lib.rs
//! Signal-view server library.
//!
//! Serves the most recently modified signal file in a watched directory to
//! pollers. Every `/data` request re-resolves the current file and re-reads
//! it, so any number of clients can poll without coordinating.

pub mod error;
pub mod metrics;
pub mod port;
pub mod routes;
pub mod state;

pub use error::*;
pub use metrics::init_metrics;
pub use port::{bind_first_free, local_ip};
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application: routes plus permissive CORS, so dashboards
/// served from other hosts can poll, and per-request tracing spans.
pub fn create_app(state: Arc<AppState>) -> Router {
    api_routes(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use signal_view_core::{ClientConfig, SourceConfig};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestServer {
        _dir: TempDir,
        app: Router,
    }

    impl TestServer {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let app = create_app(AppState::new(
                SourceConfig::new(dir.path(), "txt"),
                ClientConfig::default(),
            ));
            Self { _dir: dir, app }
        }

        async fn get(&self, uri: &str) -> (StatusCode, String) {
            let response = self
                .app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, String::from_utf8(bytes.to_vec()).unwrap())
        }
    }

    #[tokio::test]
    async fn test_health_lists_source() {
        let server = TestServer::new();
        let (status, body) = server.get("/api/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["extension"], "txt");
        assert!(json["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn test_index_serves_html_shell() {
        let server = TestServer::new();
        let (status, body) = server.get("/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<!DOCTYPE html>"));
        assert!(body.contains("const POLL_MS = 500;"));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let server = TestServer::new();
        let response = server
            .app
            .clone()
            .oneshot(
                Request::get("/data")
                    .header(header::ORIGIN, "http://dashboard.local")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = TestServer::new().get("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
