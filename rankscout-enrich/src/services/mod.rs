//! Enrichment pipeline services

pub mod batch_enricher;
pub mod provider_client;
pub mod rate_limiter;
pub mod record_extractor;

pub use batch_enricher::BatchEnricher;
pub use provider_client::{
    KeepaSource, ProductSource, ProviderClient, ProviderError, RawResponse, RetryPolicy,
};
pub use rate_limiter::RateLimiter;
pub use record_extractor::{ExtractionError, RecordExtractor};
