use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::config::proc_loader::file_to_config;
use crate::config::settings::{ClientConfig, SettingsConfig};

/// Loads the config file, falling back to built-in defaults when it is absent.
pub fn run(config_path: &str) -> Result<ClientConfig> {
    let path = Path::new(config_path);
    if !path.exists() {
        info!("config '{}' not found, using defaults", config_path);
        return Ok(ClientConfig {
            settings: SettingsConfig::default(),
        });
    }
    file_to_config(path).map_err(|e| anyhow!("Invalid config format: {}", e))
}
