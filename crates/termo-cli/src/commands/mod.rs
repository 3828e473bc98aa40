//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod doctor;
pub mod listen;
pub mod process;
pub mod search;

use std::path::{Path, PathBuf};

use termo_core::TermoConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termo")
        .join("config.json")
}

/// Path given with `--config`, otherwise the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; a missing default file yields defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TermoConfig> {
    if let Some(path) = config_path {
        return Ok(TermoConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(TermoConfig::from_file(&path)?)
    } else {
        Ok(TermoConfig::default())
    }
}
