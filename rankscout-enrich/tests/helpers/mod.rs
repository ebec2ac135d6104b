//! Test Helper Utilities
//!
//! Shared utilities for testing rankscout-enrich

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use rankscout_common::config::TomlConfig;
use rankscout_enrich::services::{ProductSource, ProviderError, RawResponse};
use rankscout_enrich::AppState;

/// Provider stand-in: known identifiers answer with a product record,
/// every other identifier fails on each attempt
#[derive(Default)]
pub struct CatalogSource {
    products: HashMap<String, Value>,
    calls: AtomicU32,
}

impl CatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identifier` with a rank, a price and a 30-day rank history
    pub fn with_product(mut self, identifier: &str, rank: i64, price: f64, day30: &[i64]) -> Self {
        self.products.insert(
            identifier.to_string(),
            json!({
                "asin": identifier,
                "salesRanks": {"current": rank, "day30": day30},
                "stats": {"current": price}
            }),
        );
        self
    }

    /// Total `fetch` calls so far, retries included
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSource for CatalogSource {
    async fn fetch(&self, identifier: &str) -> Result<RawResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.products.get(identifier) {
            Some(product) => Ok(vec![product.clone()]),
            None => Err(ProviderError::ApiError(500, "upstream failure".to_string())),
        }
    }
}

/// Provider stand-in whose every query panics
pub struct PanickingSource;

#[async_trait]
impl ProductSource for PanickingSource {
    async fn fetch(&self, identifier: &str) -> Result<RawResponse, ProviderError> {
        panic!("provider stand-in crashed on {}", identifier);
    }
}

/// CSV text with a `productId` and a `title` column, one row per identifier
pub fn product_csv(ids: &[&str]) -> String {
    let mut csv = String::from("productId,title\n");
    for (i, id) in ids.iter().enumerate() {
        csv.push_str(&format!("{},Item {}\n", id, i));
    }
    csv
}

/// `count` identifiers of the form `B000000001`, `B000000002`, ...
pub fn sequential_ids(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("B{:09}", i)).collect()
}

/// Configuration with pacing and retry delays small enough for real-time tests
pub fn fast_config() -> TomlConfig {
    let mut config = TomlConfig::default();
    config.provider.requests_per_minute = 60_000;
    config.enrichment.retry_delay_ms = 1;
    config
}

/// App state rooted at `root`
pub fn test_app_state(root: &Path, source: Option<Arc<dyn ProductSource>>) -> AppState {
    AppState::new(root.to_path_buf(), fast_config(), source)
}
