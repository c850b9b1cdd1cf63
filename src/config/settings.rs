use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_BASE_URL, DEFAULT_EXPIRY_LEAD_SECS, DEFAULT_GRAPHQL_PATH, DEFAULT_HTTP_TIMEOUT_MS,
};

/// ================================
/// Full client configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub settings: SettingsConfig,
}

/// ================================
/// Client-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// token is treated as expired this many seconds before its `exp` claim
    #[serde(default = "default_expiry_lead_seconds")]
    pub expiry_lead_seconds: u64,
    #[serde(default)]
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            graphql_path: default_graphql_path(),
            timeout_ms: default_timeout_ms(),
            expiry_lead_seconds: default_expiry_lead_seconds(),
            storage: StorageConfig::default(),
            logging: None,
            metrics: MetricsConfig::default(),
        }
    }
}

/// Subset of the settings the request pipeline needs.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub graphql_path: String,
    pub timeout_ms: u64,
}

impl From<&SettingsConfig> for ApiSettings {
    fn from(settings: &SettingsConfig) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            graphql_path: settings.graphql_path.to_owned(),
            timeout_ms: settings.timeout_ms,
        }
    }
}

impl ApiSettings {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            graphql_path: default_graphql_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// ================================
/// Session storage
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(rename = "type", default)]
    pub storage_type: StorageType,
    /// required for `file`, must be absolute
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricsConfig {
    #[serde(default)]
    pub is_enabled: bool,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_graphql_path() -> String {
    DEFAULT_GRAPHQL_PATH.to_owned()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_expiry_lead_seconds() -> u64 {
    DEFAULT_EXPIRY_LEAD_SECS
}
