use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::fetcher::FetchError;

/// Install the global Prometheus recorder
///
/// Fails if a recorder is already installed.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "content_exporter_fetches_total",
        "Total number of upstream content fetches by outcome"
    );
    describe_histogram!(
        "content_exporter_fetch_duration_seconds",
        "Upstream fetch duration in seconds"
    );
    describe_gauge!(
        "content_exporter_up",
        "Whether the last upstream fetch succeeded"
    );
    describe_gauge!(
        "content_exporter_body_bytes",
        "Body size of the last successful fetch"
    );
    describe_gauge!(
        "content_exporter_last_success_timestamp_seconds",
        "Unix time of the last successful fetch"
    );
    describe_gauge!(
        "content_exporter_info",
        "Exporter version information"
    );

    gauge!("content_exporter_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a successful fetch
pub fn record_success(mime_type: &str, body_len: usize, duration: Duration) {
    counter!(
        "content_exporter_fetches_total",
        "mime_type" => mime_type.to_string(),
        "outcome" => "success",
    )
    .increment(1);
    record_duration(mime_type, duration);

    gauge!("content_exporter_up").set(1.0);
    gauge!("content_exporter_body_bytes").set(body_len as f64);
    gauge!("content_exporter_last_success_timestamp_seconds")
        .set(chrono::Utc::now().timestamp() as f64);
}

/// Record a classified fetch failure
pub fn record_failure(mime_type: &str, error: &FetchError, duration: Duration) {
    counter!(
        "content_exporter_fetches_total",
        "mime_type" => mime_type.to_string(),
        "outcome" => error.kind().as_str(),
    )
    .increment(1);
    record_duration(mime_type, duration);

    gauge!("content_exporter_up").set(0.0);
}

fn record_duration(mime_type: &str, duration: Duration) {
    histogram!(
        "content_exporter_fetch_duration_seconds",
        "mime_type" => mime_type.to_string(),
    )
    .record(duration.as_secs_f64());
}
