//! Liveness probe that also reports what the server is watching.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Watched directory as configured (absolute after startup).
    pub root: String,
    pub extension: String,
}

impl From<&AppState> for HealthResponse {
    fn from(state: &AppState) -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            uptime_secs: state.uptime().as_secs(),
            root: state.source.root.display().to_string(),
            extension: state.source.extension.clone(),
        }
    }
}

/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::from(state.as_ref()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
