use std::fs;
use std::path::Path;

use tracing::info;

use super::Config;
use crate::errors::{Error, Result};

/// Loads and parses the TOML configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    let config: Config =
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    validate(&config, path)?;
    info!(workbook = %config.workbook.display(), "configuration loaded");
    Ok(config)
}

/// Rejects value combinations the pipelines cannot run with.
fn validate(config: &Config, path: &Path) -> Result<()> {
    if config.retrieval.chunk_size == 0 {
        return Err(Error::Config(format!(
            "{}: retrieval.chunk_size must be positive",
            path.display()
        )));
    }
    if config.retrieval.chunk_overlap >= config.retrieval.chunk_size {
        return Err(Error::Config(format!(
            "{}: retrieval.chunk_overlap ({}) must be below chunk_size ({})",
            path.display(),
            config.retrieval.chunk_overlap,
            config.retrieval.chunk_size
        )));
    }
    Ok(())
}
