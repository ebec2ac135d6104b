//! Table upload and run start
//!
//! POST /upload?filename=products.csv with the CSV as request body.
//! The table is parsed before anything is saved or started; the run itself
//! proceeds in the background and is observed through GET /status.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::BatchEnricher;
use crate::store::result_store::RESULTS_FILE;
use crate::store::InputTable;
use crate::AppState;

/// POST /upload query parameters
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// POST /upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub run_id: Uuid,
    pub filename: String,
    pub rows: usize,
}

/// POST /upload
///
/// 202 with the run id; 400 for a bad file name or unreadable table; 409 while
/// another run is active; 503 when the provider is not configured.
pub async fn upload_table(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let filename = sanitize_filename(&query.filename).ok_or_else(|| {
        ApiError::BadRequest("Invalid file type. Please upload a CSV file.".to_string())
    })?;

    let source = state.provider_source.clone().ok_or_else(|| {
        ApiError::ServiceUnavailable("Provider API key is missing or invalid".to_string())
    })?;

    let table = InputTable::from_reader(
        body.as_ref(),
        &state.config.enrichment.identifier_column,
    )?;

    let enricher = BatchEnricher::from_config(source, state.result_store(), &state.config)?
        .with_tracker(state.tracker.clone());

    let permit = state
        .tracker
        .try_begin(&filename, table.len())
        .await
        .ok_or_else(|| ApiError::Conflict("Enrichment run already active".to_string()))?;
    let run_id = permit.run_id();

    if let Err(e) = save_upload(&state.uploads_dir(), &filename, &body) {
        state.tracker.fail(permit, e.to_string()).await;
        return Err(e.into());
    }
    tracing::info!(run_id = %run_id, filename = %filename, "File saved successfully");

    let response = UploadResponse {
        run_id,
        filename,
        rows: table.len(),
    };

    let tracker = state.tracker.clone();
    let run = tokio::spawn(async move {
        match enricher.run(&table).await {
            Ok(summary) => tracker.complete(permit, summary).await,
            Err(e) => tracker.fail(permit, e.to_string()).await,
        }
    });

    // A panicking run drops its permit without reporting
    let tracker = state.tracker.clone();
    tokio::spawn(async move {
        if let Err(e) = run.await {
            tracker.abort(run_id, e.to_string()).await;
        }
    });

    Ok((StatusCode::ACCEPTED, Json(response)))
}

fn save_upload(uploads: &Path, filename: &str, body: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(uploads)?;
    std::fs::write(uploads.join(filename), body)
}

/// Reduce a client-supplied name to a safe `.csv` file name
///
/// Keeps the last path component; letters, digits, `.`, `-` and `_` survive,
/// whitespace becomes `_`, everything else is dropped. The result store's own
/// file name is refused.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    let (stem, extension) = cleaned.rsplit_once('.')?;
    if stem.is_empty() || !extension.eq_ignore_ascii_case("csv") {
        return None;
    }
    if cleaned.eq_ignore_ascii_case(RESULTS_FILE) {
        return None;
    }

    Some(cleaned)
}

pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_table))
}
