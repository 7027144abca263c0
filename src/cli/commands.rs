//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::api;
use crate::cli::{error, info, success, warn};
use crate::config::{self, Config};
use crate::store;

/// Initialize a new passage.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("passage.toml already exists");
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success("Created passage.toml");
    info("Set JWT_SECRET_KEY and DB_URI (or edit the file), then run 'passage serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server on {}:{}", host, port));

    if let Err(e) = api::run_server(config, &host, port).await {
        error(&format!("Server failed: {}", e));
        return Err(e.into());
    }

    Ok(())
}

/// Create the database schema
pub async fn migrate(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let backend = store::connect(&config.database).await?;

    if backend.is_memory() {
        warn("In-memory store needs no migration");
        return Ok(());
    }

    backend.migrate().await?;
    success("Database schema is up to date");

    Ok(())
}

/// Sweep expired entries from the revocation ledger
pub async fn prune(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let backend = store::connect(&config.database).await?;

    if backend.is_memory() {
        warn("In-memory store is empty at startup; nothing to prune");
        return Ok(());
    }

    let removed = backend
        .ledger()
        .purge_expired(chrono::Utc::now())
        .await?;
    success(&format!("Removed {} expired revocation entries", removed));

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config()?,
    };
    config.validate()?;
    Ok(config)
}
