//! Showcase server binary.
//!
//! Wires configuration, logging, the cache store, and the `TVmaze` client
//! into the catalog HTTP server.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `showcase-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Connect the cache store (Dragonfly, or in-process memory)
//! 4. Build the `TVmaze` client
//! 5. Serve HTTP until `Ctrl-C`

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use showcase_cache::CacheStore;
use showcase_core::config::{LogFormat, LoggingConfig};
use showcase_core::{Catalog, CatalogConfig};
use showcase_server::{AppState, TvMazeClient, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default configuration file, resolved against the working directory.
const CONFIG_PATH: &str = "showcase-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration. Logging is not up yet, so a missing file is
    // reported after init.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config_file = from_file,
        host = config.server.host,
        port = config.server.port,
        provider = config.provider.base_url,
        min_per_genre = config.coverage.min_per_genre,
        max_pages = config.coverage.max_pages,
        "showcase starting"
    );

    // 3. Cache store.
    let store = CacheStore::connect(config.infrastructure.dragonfly_url.as_deref())
        .await
        .context("connecting cache store")?;
    info!(backend = store.name(), "Cache store ready");

    // 4. Provider.
    let provider = TvMazeClient::new(&config.provider).context("building TVmaze client")?;

    // 5. Serve.
    let catalog = Catalog::new(provider, store, config.coverage);
    let state = Arc::new(AppState::new(catalog));
    start_server(&config.server, state)
        .await
        .context("running catalog server")?;

    Ok(())
}

/// Read [`CONFIG_PATH`] if it exists, otherwise start from defaults.
/// Environment overrides apply either way.
fn load_config() -> anyhow::Result<(CatalogConfig, bool)> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        let config = CatalogConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        return Ok((config, true));
    }

    let mut config = CatalogConfig::default();
    config.apply_env_overrides();
    Ok((config, false))
}

/// `RUST_LOG` wins over `logging.level` when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
