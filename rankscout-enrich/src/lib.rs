//! rankscout-enrich library interface
//!
//! Batch enrichment of uploaded product tables with marketplace analytics,
//! plus the HTTP surface that starts runs and serves the stored results.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use rankscout_common::config::TomlConfig;

use crate::models::RunTracker;
use crate::services::ProductSource;
use crate::store::ResultStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Data folder (uploads, results, settings)
    pub root_folder: PathBuf,
    pub config: Arc<TomlConfig>,
    /// `None` when no provider credential is configured; uploads are refused
    pub provider_source: Option<Arc<dyn ProductSource>>,
    /// Single-run lock and run status
    pub tracker: Arc<RunTracker>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        root_folder: PathBuf,
        config: TomlConfig,
        provider_source: Option<Arc<dyn ProductSource>>,
    ) -> Self {
        Self {
            root_folder,
            config: Arc::new(config),
            provider_source,
            tracker: Arc::new(RunTracker::new()),
            startup_time: Utc::now(),
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        config::uploads_dir(&self.root_folder)
    }

    pub fn settings_path(&self) -> PathBuf {
        config::settings_path(&self.root_folder)
    }

    pub fn result_store(&self) -> ResultStore {
        ResultStore::in_folder(&self.uploads_dir())
            .with_identifier_column(&self.config.enrichment.identifier_column)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::upload_routes())
        .merge(api::status_routes())
        .merge(api::results_routes())
        .merge(api::history_routes())
        .merge(api::settings_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
