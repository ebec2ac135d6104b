//! Configuration resolution for rankscout-enrich
//!
//! Provider credential priority: ENV → TOML.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use rankscout_common::config::TomlConfig;
use rankscout_common::{Error, Result};

use crate::services::{KeepaSource, ProductSource};

/// Environment variable holding the provider credential
pub const API_KEY_ENV: &str = "KEEPA_API_KEY";

/// Resolve the provider API key
///
/// **Priority:** ENV → TOML. Blank values are ignored.
pub fn resolve_provider_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .provider
        .api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Provider API key found in both environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Provider API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("Provider API key loaded from TOML config");
        return Ok(key);
    }

    Err(Error::Config(format!(
        "Provider API key is missing or invalid. Configure one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: [provider] api_key = \"your-key\"",
        API_KEY_ENV
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Reject settings the pipeline cannot run with
pub fn validate_config(config: &TomlConfig) -> Result<()> {
    if config.provider.requests_per_minute == 0 {
        return Err(Error::Config(
            "provider.requests_per_minute must be greater than zero".to_string(),
        ));
    }
    if config.enrichment.identifier_column.trim().is_empty() {
        return Err(Error::Config(
            "enrichment.identifier_column must not be empty".to_string(),
        ));
    }
    if config.enrichment.checkpoint_every == 0 {
        return Err(Error::Config(
            "enrichment.checkpoint_every must be greater than zero".to_string(),
        ));
    }
    if config.enrichment.max_attempts == 0 {
        return Err(Error::Config(
            "enrichment.max_attempts must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Resolve the credential and build the production provider source
pub fn build_provider_source(config: &TomlConfig) -> Result<Arc<dyn ProductSource>> {
    let api_key = resolve_provider_api_key(config)?;
    Ok(Arc::new(KeepaSource::new(api_key, &config.provider)?))
}

/// Folder holding uploaded tables and the result store
pub fn uploads_dir(root_folder: &Path) -> PathBuf {
    root_folder.join("uploads")
}

/// Alert settings file
pub fn settings_path(root_folder: &Path) -> PathBuf {
    root_folder.join("settings.json")
}
