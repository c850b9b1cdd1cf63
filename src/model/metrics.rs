use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::helpers::serde::string_or_number;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMetric {
    #[serde(default)]
    pub method_name: String,
    #[serde(default)]
    pub total_calls: u64,
    #[serde(default)]
    pub successful_calls: u64,
    #[serde(default)]
    pub failed_calls: u64,
    #[serde(default)]
    pub total_execution_time: f64,
    #[serde(default)]
    pub min_execution_time: f64,
    #[serde(default)]
    pub max_execution_time: f64,
    #[serde(default)]
    pub average_execution_time: f64,
}

/// `GET /api/metrics/performance`, keyed by method name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    #[serde(default)]
    pub metrics: HashMap<String, MethodMetric>,
    #[serde(default)]
    pub total_methods: u64,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    #[serde(default)]
    pub total_failures: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub overall_average_execution_time: Option<String>,
    #[serde(default)]
    pub total_executions: u64,
    #[serde(default)]
    pub total_methods_monitored: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetric {
    #[serde(default)]
    pub cache_name: String,
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub misses: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub hit_rate: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub miss_rate: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetricsResponse {
    #[serde(default)]
    pub caches: HashMap<String, CacheMetric>,
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSummary {
    #[serde(default)]
    pub total_caches: u64,
    #[serde(default)]
    pub total_hits: u64,
    #[serde(default)]
    pub total_misses: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub overall_hit_rate: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Saved baseline or post-cache measurement.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    pub snapshot_type: Option<String>,
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceComparison {
    pub baseline: Option<PerformanceSnapshot>,
    pub post_cache: Option<PerformanceSnapshot>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub improvement_percentage: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration_ms: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{status, message}` acknowledgement of export and reset calls.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}
