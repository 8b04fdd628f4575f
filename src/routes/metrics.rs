use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// GET /metrics — scan counters and latencies in Prometheus text format.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}

/// Register descriptions for the metrics emitted by the scan pipeline.
pub fn describe_metrics() {
    metrics::describe_counter!("label_scans_total", "Label scans received");
    metrics::describe_counter!(
        "label_scans_failed",
        "Label scans that failed, by pipeline stage"
    );
    metrics::describe_histogram!(
        "label_scan_seconds",
        metrics::Unit::Seconds,
        "End-to-end time of a successful label scan"
    );
    metrics::describe_histogram!(
        "vision_request_seconds",
        metrics::Unit::Seconds,
        "Latency of Vision API annotate calls"
    );
}
