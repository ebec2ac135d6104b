//! Upload history

use axum::{extract::State, routing::get, Json, Router};

use crate::error::ApiResult;
use crate::AppState;

/// GET /history
///
/// Files in the uploads folder, sorted by name. Temporary files are hidden.
pub async fn get_history(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let uploads = state.uploads_dir();
    if !uploads.exists() {
        return Ok(Json(Vec::new()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&uploads)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".tmp") {
            files.push(name);
        }
    }
    files.sort();

    Ok(Json(files))
}

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/history", get(get_history))
}
