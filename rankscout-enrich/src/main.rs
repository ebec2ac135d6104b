//! rankscout-enrich - Product table enrichment service
//!
//! `serve` (default) runs the HTTP API; `enrich <CSV>` performs one
//! enrichment run from the command line and prints its summary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rankscout_common::config::{default_config_path, load_toml_config, resolve_root_folder};
use rankscout_enrich::config::{build_provider_source, uploads_dir, validate_config};
use rankscout_enrich::services::BatchEnricher;
use rankscout_enrich::store::{InputTable, ResultStore};
use rankscout_enrich::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "rankscout-enrich", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "RANKSCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Data folder (overrides RANKSCOUT_ROOT and the config file)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides [server] bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Enrich one CSV file and write the result table
    Enrich {
        /// Input CSV with an identifier column
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_toml_config(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting rankscout-enrich v{} (config: {})",
        env!("CARGO_PKG_VERSION"),
        config_path.display()
    );

    validate_config(&config)?;

    let root_folder = resolve_root_folder(cli.root_folder.as_deref(), &config);
    std::fs::create_dir_all(&root_folder)
        .with_context(|| format!("Failed to initialize root folder {}", root_folder.display()))?;
    info!("Root folder: {}", root_folder.display());

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => serve(root_folder, config, bind).await,
        Command::Enrich { input } => enrich(root_folder, config, input).await,
    }
}

async fn serve(
    root_folder: PathBuf,
    config: rankscout_common::config::TomlConfig,
    bind: Option<String>,
) -> Result<()> {
    let provider_source = match build_provider_source(&config) {
        Ok(source) => Some(source),
        Err(e) => {
            warn!("Uploads disabled until the provider is configured: {}", e);
            None
        }
    };

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::new(root_folder, config, provider_source);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn enrich(
    root_folder: PathBuf,
    config: rankscout_common::config::TomlConfig,
    input: PathBuf,
) -> Result<()> {
    // Credential problems surface before the input is even read
    let source = build_provider_source(&config)?;

    let table = InputTable::from_path(&input, &config.enrichment.identifier_column)?;
    info!(input = %input.display(), rows = table.len(), "Input table loaded");

    let store = ResultStore::in_folder(&uploads_dir(&root_folder))
        .with_identifier_column(&config.enrichment.identifier_column);
    let enricher = BatchEnricher::from_config(source, store, &config)?;

    match enricher.run(&table).await {
        Ok(summary) => {
            info!(path = %enricher.store().path().display(), "Enrichment complete");
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(e) => {
            error!("Enrichment failed: {}", e);
            Err(e.into())
        }
    }
}
