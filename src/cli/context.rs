use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::cli::commands::GlobalOpts;
use crate::config::{parse_config, ReconConfig};
use crate::db::Database;
use crate::errors::ReconError;

pub const DEFAULT_CONFIG_FILE: &str = "reconnoiter.yaml";

/// Explicit `--config`, else `./reconnoiter.yaml` if it exists, else defaults.
pub async fn load_config(global: &GlobalOpts) -> Result<ReconConfig, ReconError> {
    match &global.config {
        Some(path) => parse_config(Path::new(path)).await,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            debug!(path = DEFAULT_CONFIG_FILE, "Using default config file");
            parse_config(Path::new(DEFAULT_CONFIG_FILE)).await
        }
        None => Ok(ReconConfig::default()),
    }
}

pub fn open_store(global: &GlobalOpts, config: &ReconConfig) -> Result<Arc<Database>, ReconError> {
    let path = global
        .db
        .clone()
        .unwrap_or_else(|| config.storage().database);
    debug!(path = %path, "Opening database");
    Ok(Arc::new(Database::new(&path)?))
}
