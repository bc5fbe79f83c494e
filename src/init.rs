// Initialization utilities for the CLI
//
// Remote store and logging/tracing setup

use anyhow::{Context, Result};
use healthflow_config::{LogFormat, LoggingConfig, RemoteConfig};
use healthflow_storage::RemoteStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Directive appended in quiet mode; per-operation storage lines are `info`
const QUIET_DIRECTIVE: &str = "healthflow_storage=warn";

/// Build the remote store from the `[remote]` section
pub fn init_remote(config: &RemoteConfig) -> Result<RemoteStore> {
    info!(
        "Initializing remote store with backend: {} (namespace: {})",
        config.backend, config.namespace
    );

    RemoteStore::from_config(config).context("Failed to initialize remote store")
}

/// Log filter for the given logging section
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if !config.quiet {
        return filter;
    }

    match QUIET_DIRECTIVE.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Initialize tracing/logging from LoggingConfig
pub fn init_tracing(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, prelude::*};

    let registry = tracing_subscriber::registry().with(build_filter(config));

    // Try to set the global subscriber; ignore error if already set (idempotent)
    let _ = match config.format {
        LogFormat::Json => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().json()))
        }
        LogFormat::Text => tracing::subscriber::set_global_default(registry.with(fmt::layer())),
    };
}
