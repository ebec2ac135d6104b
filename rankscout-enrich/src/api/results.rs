//! Read-side result views
//!
//! GET /results/all, /results/recent, /results/hits, /results/sort/:direction

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use rankscout_common::Record;

use crate::error::ApiResult;
use crate::store::{filter_hits, filter_recent, sort_by_rank, SortDirection};
use crate::AppState;

/// GET /results/all
pub async fn results_all(State(state): State<AppState>) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(state.result_store().read_all()?))
}

/// GET /results/recent
pub async fn results_recent(State(state): State<AppState>) -> ApiResult<Json<Vec<Record>>> {
    let records = state.result_store().read_all()?;
    Ok(Json(filter_recent(records, &state.config.results)))
}

/// GET /results/hits
pub async fn results_hits(State(state): State<AppState>) -> ApiResult<Json<Vec<Record>>> {
    let records = state.result_store().read_all()?;
    Ok(Json(filter_hits(records, &state.config.results)))
}

/// GET /results/sort/:direction
///
/// `direction` is `asc` or `desc`; anything else is 400.
pub async fn results_sorted(
    State(state): State<AppState>,
    Path(direction): Path<String>,
) -> ApiResult<Json<Vec<Record>>> {
    let direction: SortDirection = direction.parse()?;
    let records = state.result_store().read_all()?;
    Ok(Json(sort_by_rank(records, direction)))
}

pub fn results_routes() -> Router<AppState> {
    Router::new()
        .route("/results/all", get(results_all))
        .route("/results/recent", get(results_recent))
        .route("/results/hits", get(results_hits))
        .route("/results/sort/:direction", get(results_sorted))
}
