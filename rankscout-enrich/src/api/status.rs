//! Enrichment run status

use axum::{extract::State, routing::get, Json, Router};

use crate::models::RunStatus;
use crate::AppState;

/// GET /status
///
/// Snapshot of the current (or last) enrichment run.
pub async fn get_status(State(state): State<AppState>) -> Json<RunStatus> {
    Json(state.tracker.snapshot().await)
}

pub fn status_routes() -> Router<AppState> {
    Router::new().route("/status", get(get_status))
}
