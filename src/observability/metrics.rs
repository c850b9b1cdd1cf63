use std::sync::Arc;

use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Request pipeline
    pub requests: IntCounterVec,
    pub request_failures: IntCounterVec,
    pub request_duration: HistogramVec,
    pub unauthorized_retries: IntCounter,

    // Refresh coordinator
    pub refreshes: IntCounterVec,
    pub refresh_waiters: IntCounter,

    // Session lifecycle
    pub session_events: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        // metric names and labels are static; building them only fails on a typo
        Arc::new(Self::build().expect("static metric definitions are valid"))
    }

    fn build() -> Result<Self> {
        let metrics = Self {
            registry: Registry::new_custom(Some("devblog_client".into()), None)?,

            // Request pipeline
            requests: IntCounterVec::new(Opts::new("requests_total", "Backend calls by transport and method"), &["transport", "method"])?,
            request_failures: IntCounterVec::new(Opts::new("request_failures_total", "Failure envelopes by transport and error code"), &["transport", "code"])?,
            request_duration: HistogramVec::new(HistogramOpts::new("request_duration_seconds", "Backend call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["transport"])?,
            unauthorized_retries: IntCounter::new("unauthorized_retries_total", "Calls retried after a 401")?,

            // Refresh coordinator
            refreshes: IntCounterVec::new(Opts::new("refresh_total", "Token refresh network calls by outcome"), &["outcome"])?,
            refresh_waiters: IntCounter::new("refresh_waiters_total", "Callers that joined an in-flight refresh")?,

            // Session lifecycle
            session_events: IntCounterVec::new(Opts::new("session_events_total", "Published session events"), &["event"])?,
        };

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.requests.clone()))?;
        reg.register(Box::new(metrics.request_failures.clone()))?;
        reg.register(Box::new(metrics.request_duration.clone()))?;
        reg.register(Box::new(metrics.unauthorized_retries.clone()))?;
        reg.register(Box::new(metrics.refreshes.clone()))?;
        reg.register(Box::new(metrics.refresh_waiters.clone()))?;
        reg.register(Box::new(metrics.session_events.clone()))?;

        Ok(metrics)
    }
}

/// Text exposition of everything recorded so far.
pub async fn render() -> Result<String> {
    let metrics = get_metrics().await;
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recorded_counters_are_rendered() {
        let metrics = get_metrics().await;
        metrics.session_events.with_label_values(&["signed_out"]).inc();

        let text = render().await.unwrap();
        assert!(text.contains("devblog_client_session_events_total"));
    }
}
