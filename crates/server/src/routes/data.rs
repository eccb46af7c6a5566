//! The live data endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use signal_view_core::{current_snapshot, SignalSnapshot, ERROR_READING_FILE, NO_FILE_FOUND};

use crate::metrics::{DataOutcome, RequestTimer};
use crate::state::AppState;

/// GET /data - Full sequence of the current file plus its name.
///
/// Always 200. "No file" and "unreadable file" are reported through the
/// sentinel `filename` values with an empty `values` array, so pollers
/// have a single code path.
pub async fn get_data(State(state): State<Arc<AppState>>) -> Json<SignalSnapshot> {
    let timer = RequestTimer::new();
    let snapshot = current_snapshot(&state.source).await;

    let outcome = match snapshot.filename.as_str() {
        NO_FILE_FOUND => DataOutcome::NoFile,
        ERROR_READING_FILE => DataOutcome::ReadError,
        _ => DataOutcome::File,
    };
    timer.finish(outcome, snapshot.values.len());

    Json(snapshot)
}

/// Create the data routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/data", get(get_data))
}
