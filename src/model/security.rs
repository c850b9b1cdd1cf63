use serde::Deserialize;
use serde_json::{Map, Value};

use crate::helpers::serde::string_or_number;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityStats {
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub failed_logins: u64,
    #[serde(default)]
    pub blocked_ips: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One audit log entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub event_type: Option<String>,
    pub username: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: Option<String>,
    pub details: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
