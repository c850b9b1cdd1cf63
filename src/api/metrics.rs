use serde::de::DeserializeOwned;

use crate::client::envelope::ApiEnvelope;
use crate::client::pipeline::ApiClient;
use crate::client::request::RequestSpec;
use crate::model::metrics::{
    CacheMetric, CacheMetricsResponse, CacheSummary, MetricsResponse, MetricsSummary,
    PerformanceComparison, PerformanceSnapshot, SimulationResult, StatusMessage,
};

const PERFORMANCE: &str = "/api/metrics/performance";

/// Backend performance dashboard. These endpoints answer with bare payloads,
/// so every success carries a message naming what was retrieved.
pub struct MetricsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MetricsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn performance(&self) -> ApiEnvelope<MetricsResponse> {
        self.call(RequestSpec::get(PERFORMANCE), "Metrics retrieved").await
    }

    pub async fn summary(&self) -> ApiEnvelope<MetricsSummary> {
        self.call(RequestSpec::get(format!("{}/summary", PERFORMANCE)), "Summary retrieved")
            .await
    }

    pub async fn export_log(&self) -> ApiEnvelope<StatusMessage> {
        self.call(RequestSpec::post(format!("{}/export-log", PERFORMANCE)), "Metrics exported")
            .await
    }

    pub async fn reset(&self) -> ApiEnvelope<StatusMessage> {
        self.call(RequestSpec::delete(format!("{}/reset", PERFORMANCE)), "Metrics reset")
            .await
    }

    pub async fn cache(&self) -> ApiEnvelope<CacheMetricsResponse> {
        self.call(RequestSpec::get(format!("{}/cache", PERFORMANCE)), "Cache metrics retrieved")
            .await
    }

    pub async fn cache_by_name(&self, cache_name: &str) -> ApiEnvelope<CacheMetric> {
        self.call(
            RequestSpec::get(format!("{}/cache/{}", PERFORMANCE, cache_name)),
            "Cache metric retrieved",
        )
        .await
    }

    pub async fn cache_summary(&self) -> ApiEnvelope<CacheSummary> {
        self.call(
            RequestSpec::get(format!("{}/cache/summary", PERFORMANCE)),
            "Cache summary retrieved",
        )
        .await
    }

    pub async fn reset_cache(&self) -> ApiEnvelope<StatusMessage> {
        self.call(RequestSpec::delete(format!("{}/cache/reset", PERFORMANCE)), "Cache metrics reset")
            .await
    }

    pub async fn save_baseline(&self) -> ApiEnvelope<PerformanceSnapshot> {
        self.call(
            RequestSpec::post(format!("{}/snapshot/baseline", PERFORMANCE)),
            "Baseline saved",
        )
        .await
    }

    pub async fn save_post_cache(&self) -> ApiEnvelope<PerformanceSnapshot> {
        self.call(
            RequestSpec::post(format!("{}/snapshot/post-cache", PERFORMANCE)),
            "Post-cache snapshot saved",
        )
        .await
    }

    pub async fn latest_baseline(&self) -> ApiEnvelope<PerformanceSnapshot> {
        self.call(
            RequestSpec::get(format!("{}/snapshot/baseline/latest", PERFORMANCE)),
            "Baseline retrieved",
        )
        .await
    }

    pub async fn latest_post_cache(&self) -> ApiEnvelope<PerformanceSnapshot> {
        self.call(
            RequestSpec::get(format!("{}/snapshot/post-cache/latest", PERFORMANCE)),
            "Post-cache snapshot retrieved",
        )
        .await
    }

    pub async fn comparison(&self) -> ApiEnvelope<PerformanceComparison> {
        self.call(RequestSpec::get(format!("{}/comparison", PERFORMANCE)), "Comparison retrieved")
            .await
    }

    /// Asks the backend to replay `requests` synthetic reads.
    pub async fn run_simulation(&self, requests: u32) -> ApiEnvelope<SimulationResult> {
        self.call(
            RequestSpec::post(format!("{}/simulate", PERFORMANCE)).query("requests", requests),
            "Simulation completed",
        )
        .await
    }

    async fn call<T: DeserializeOwned>(&self, spec: RequestSpec, message: &str) -> ApiEnvelope<T> {
        let mut response = self.client.send::<T>(spec).await?;
        response.message = message.to_owned();
        Ok(response)
    }
}
