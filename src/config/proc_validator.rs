//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates base url scheme, paths, timeouts, storage and logging invariants

use std::path::Path;

use tracing::{error, info};

use crate::config::settings::{ClientConfig, SettingsConfig, StorageConfig, StorageType};

const MAX_EXPIRY_LEAD_SECS: u64 = 60 * 60;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_client_config(cfg: &ClientConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_storage(&cfg.settings.storage, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    let base_url = settings.base_url.as_str();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(format!(
            "settings.base_url '{}' must start with http:// or https://",
            base_url
        ));
    }

    if !settings.graphql_path.starts_with('/') {
        errors.push(format!(
            "settings.graphql_path '{}' must start with '/'",
            settings.graphql_path
        ));
    }

    if settings.timeout_ms == 0 {
        errors.push("settings.timeout_ms must be > 0".to_string());
    }

    if settings.expiry_lead_seconds > MAX_EXPIRY_LEAD_SECS {
        errors.push(format!(
            "settings.expiry_lead_seconds ({}) is unreasonably large",
            settings.expiry_lead_seconds
        ));
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

fn validate_storage(storage: &StorageConfig, errors: &mut Vec<String>) {
    match (storage.storage_type, storage.path.as_deref()) {
        (StorageType::File, None) => {
            errors.push("settings.storage.path is required when type=file".to_string());
        }
        (StorageType::File, Some(path)) if !Path::new(path).is_absolute() => {
            errors.push(format!(
                "settings.storage.path '{}' must be an absolute path, relative paths are not allowed",
                path
            ));
        }
        (StorageType::Memory, Some(path)) => {
            errors.push(format!(
                "settings.storage.path '{}' is only valid when type=file",
                path
            ));
        }
        _ => {}
    }
}
