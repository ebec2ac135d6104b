//! Analytics provider client
//!
//! `ProductSource` is one round trip to the provider; `ProviderClient` wraps a
//! source with a bounded, fixed-delay retry policy. Transport failures never
//! escape the client: an identifier the provider cannot answer yields no data
//! and the batch carries on.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use rankscout_common::config::{EnrichmentConfig, ProviderConfig};
use rankscout_common::{Error, Result};

const USER_AGENT: &str = concat!("rankscout/", env!("CARGO_PKG_VERSION"));

/// Product records returned for one query, best match first
pub type RawResponse = Vec<Value>;

/// Provider transport errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Token budget exhausted")]
    TokensExhausted,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One query round trip against the analytics provider
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(&self, identifier: &str) -> std::result::Result<RawResponse, ProviderError>;
}

/// Keepa product endpoint response
#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    products: Vec<Value>,
    #[serde(rename = "tokensLeft")]
    tokens_left: Option<i64>,
}

/// HTTP source for the Keepa `/product` endpoint
pub struct KeepaSource {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    domain: u8,
}

impl KeepaSource {
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("Provider API key is blank".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            domain: config.domain,
        })
    }
}

#[async_trait]
impl ProductSource for KeepaSource {
    async fn fetch(&self, identifier: &str) -> std::result::Result<RawResponse, ProviderError> {
        let url = format!("{}/product", self.base_url);
        let domain = self.domain.to_string();
        let params = [
            ("key", self.api_key.as_str()),
            ("domain", domain.as_str()),
            ("asin", identifier),
            ("stats", "30"),
        ];

        tracing::debug!(identifier = %identifier, url = %url, "Querying provider");

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 402 {
            return Err(ProviderError::InvalidApiKey);
        }

        if status == 429 {
            return Err(ProviderError::TokensExhausted);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(status.as_u16(), error_text));
        }

        let body: ProductResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        tracing::debug!(
            identifier = %identifier,
            products = body.products.len(),
            tokens_left = ?body.tokens_left,
            "Provider responded"
        );

        Ok(body.products)
    }
}

/// Attempt budget and pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

impl From<&EnrichmentConfig> for RetryPolicy {
    fn from(config: &EnrichmentConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.retry_delay_ms))
    }
}

/// Provider client with bounded retry
#[derive(Clone)]
pub struct ProviderClient {
    source: Arc<dyn ProductSource>,
    retry: RetryPolicy,
}

impl ProviderClient {
    pub fn new(source: Arc<dyn ProductSource>, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    /// Query one identifier
    ///
    /// Returns `None` when the provider knows nothing about the identifier or
    /// every attempt failed.
    pub async fn query(&self, identifier: &str) -> Option<RawResponse> {
        let max_attempts = self.retry.max_attempts;

        for attempt in 1..=max_attempts {
            match self.source.fetch(identifier).await {
                Ok(products) if products.is_empty() => {
                    tracing::info!(identifier = %identifier, "Provider returned no products");
                    return None;
                }
                Ok(products) => return Some(products),
                Err(e) => {
                    tracing::error!(
                        identifier = %identifier,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Provider query failed"
                    );

                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        tracing::warn!(
            identifier = %identifier,
            attempts = max_attempts,
            "Provider unavailable, skipping enrichment"
        );
        None
    }
}
