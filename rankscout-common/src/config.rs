//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "RANKSCOUT_ROOT";

/// RankScout TOML configuration file
///
/// Every section is optional; missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Data folder holding uploads, results and settings
    pub root_folder: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub provider: ProviderConfig,
    pub enrichment: EnrichmentConfig,
    pub results: ResultsConfig,
    pub server: ServerConfig,
}

/// Logging section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive (`RUST_LOG` takes precedence)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// External analytics provider section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider credential; `KEEPA_API_KEY` overrides it
    pub api_key: Option<String>,
    pub base_url: String,
    /// Marketplace domain id (1 = .com)
    pub domain: u8,
    /// Token budget: maximum provider requests per minute
    pub requests_per_minute: u32,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.keepa.com".to_string(),
            domain: 1,
            requests_per_minute: 10,
            timeout_secs: 30,
        }
    }
}

/// Batch enrichment section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Column holding the product identifier
    pub identifier_column: String,
    /// Flush the accumulated results whenever `index % checkpoint_every == 0`
    pub checkpoint_every: usize,
    /// Provider attempts per identifier, first attempt included
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub retry_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            identifier_column: "productId".to_string(),
            checkpoint_every: 10,
            max_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

/// Read-side filter criteria
///
/// The defaults are placeholder criteria: they reference `date` and `sales`
/// columns that enrichment never produces. Point them at real columns
/// (e.g. `hits_field = "monthly_sales"`) to make the filters meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub recent_field: String,
    pub recent_marker: String,
    pub hits_field: String,
    pub hits_threshold: f64,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            recent_field: "date".to_string(),
            recent_marker: "recent".to_string(),
            hits_field: "sales".to_string(),
            hits_threshold: 100.0,
        }
    }
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Load the TOML configuration at `path`
///
/// A missing file yields the default configuration; an unreadable or
/// malformed file is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Default configuration file path for the platform
///
/// `~/.config/rankscout/config.toml` on Linux, the platform config dir elsewhere.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("rankscout").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("rankscout.toml"))
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument
/// 2. `RANKSCOUT_ROOT` environment variable
/// 3. TOML `root_folder`
/// 4. OS-dependent default
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("rankscout"))
        .unwrap_or_else(|| PathBuf::from("./rankscout_data"))
}
