//! Data models for rankscout-enrich

pub mod enrichment;
pub mod run_state;
pub mod settings;

pub use enrichment::EnrichmentResult;
pub use run_state::{RunPermit, RunStatus, RunSummary, RunTracker};
pub use settings::AlertSettings;
