//! Alert settings API
//!
//! GET /settings, POST /settings

use axum::{extract::State, routing::get, Json, Router};

use crate::error::ApiResult;
use crate::models::AlertSettings;
use crate::AppState;

/// GET /settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<AlertSettings>> {
    Ok(Json(AlertSettings::load(&state.settings_path())?))
}

/// POST /settings
///
/// Replaces the stored settings and echoes them back.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<AlertSettings>,
) -> ApiResult<Json<AlertSettings>> {
    settings.save(&state.settings_path())?;
    Ok(Json(settings))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).post(update_settings))
}
