//! Batch enrichment pipeline
//!
//! Walks the input table in order, one row at a time:
//! query (with retry) → extract → merge → checkpoint → pace.
//! Per-identifier failures leave the row unenriched; only store write
//! failures abort a run.

use std::sync::Arc;

use rankscout_common::config::TomlConfig;
use rankscout_common::{Record, Result};

use crate::models::{RunSummary, RunTracker};
use crate::services::provider_client::{ProductSource, ProviderClient, RetryPolicy};
use crate::services::rate_limiter::RateLimiter;
use crate::services::record_extractor::RecordExtractor;
use crate::store::{InputTable, ResultStore};

/// Default checkpoint interval (input rows)
pub const DEFAULT_CHECKPOINT_EVERY: usize = 10;

/// Drives one enrichment run
pub struct BatchEnricher {
    provider: ProviderClient,
    extractor: RecordExtractor,
    limiter: RateLimiter,
    store: ResultStore,
    checkpoint_every: usize,
    tracker: Option<Arc<RunTracker>>,
}

impl BatchEnricher {
    pub fn new(provider: ProviderClient, limiter: RateLimiter, store: ResultStore) -> Self {
        Self {
            provider,
            extractor: RecordExtractor::new(),
            limiter,
            store,
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            tracker: None,
        }
    }

    /// Build from configuration: token budget, retry policy and checkpoint
    /// interval all come from `config`
    pub fn from_config(
        source: Arc<dyn ProductSource>,
        store: ResultStore,
        config: &TomlConfig,
    ) -> Result<Self> {
        let limiter = RateLimiter::per_minute(config.provider.requests_per_minute)?;
        let provider = ProviderClient::new(source, RetryPolicy::from(&config.enrichment));

        Ok(Self::new(provider, limiter, store)
            .with_checkpoint_every(config.enrichment.checkpoint_every))
    }

    /// Flush whenever `index % every == 0`; zero is treated as 1
    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = every.max(1);
        self
    }

    /// Report per-row progress to `tracker`
    pub fn with_tracker(mut self, tracker: Arc<RunTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Enrich every row of `table` and persist the result table
    pub async fn run(&self, table: &InputTable) -> Result<RunSummary> {
        let mut accumulated: Vec<Record> = Vec::with_capacity(table.len());
        let mut summary = RunSummary {
            rows_read: table.len(),
            ..Default::default()
        };

        tracing::info!(
            rows = table.len(),
            checkpoint_every = self.checkpoint_every,
            interval_ms = self.limiter.min_interval().as_millis() as u64,
            "Starting batch enrichment"
        );

        for (index, row) in table.rows().iter().enumerate() {
            let Some(identifier) = row.identifier() else {
                tracing::debug!(index, "Skipping row with empty identifier");
                summary.rows_skipped += 1;
                self.report_progress(index + 1).await;
                continue;
            };

            let enrichment = match self.provider.query(identifier).await {
                Some(response) => self.extractor.extract(identifier, &response),
                None => None,
            };

            let merged = match enrichment {
                Some(result) => {
                    summary.rows_enriched += 1;
                    result.merge_into(row.fields().clone())
                }
                None => {
                    tracing::info!(index, identifier = %identifier, "Row kept without enrichment");
                    summary.rows_unenriched += 1;
                    row.fields().clone()
                }
            };
            accumulated.push(merged);

            if index % self.checkpoint_every == 0 {
                self.store.write_all(&accumulated)?;
                summary.flushes += 1;
                tracing::debug!(index, rows = accumulated.len(), "Checkpoint written");
            }

            self.report_progress(index + 1).await;
            self.limiter.acquire().await;
        }

        self.store.write_all(&accumulated)?;
        summary.flushes += 1;

        tracing::info!(
            rows_read = summary.rows_read,
            rows_enriched = summary.rows_enriched,
            rows_unenriched = summary.rows_unenriched,
            rows_skipped = summary.rows_skipped,
            flushes = summary.flushes,
            "Batch enrichment finished"
        );

        Ok(summary)
    }

    async fn report_progress(&self, processed: usize) {
        if let Some(tracker) = &self.tracker {
            tracker.record_progress(processed).await;
        }
    }
}
