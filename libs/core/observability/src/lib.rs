//! Prometheus metrics for the gateway.
//!
//! - process-wide recorder ([`init_metrics`]) and `/metrics` rendering
//! - [`middleware::metrics_middleware`] for per-route request metrics
//! - [`IngestionMetrics`] for ingestion and registration outcomes
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, IngestionMetrics};
//!
//! init_metrics();
//! IngestionMetrics::event_ingested(IngestOutcome::Created);
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod ingestion;
pub mod middleware;

pub use ingestion::{IngestOutcome, IngestionMetrics};
pub use middleware::metrics_middleware;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once and return its handle.
///
/// If another recorder already owns the global slot, a detached recorder is
/// created so `/metrics` still renders instead of failing start-up.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!(error = %e, "Global metrics recorder unavailable, using a detached one");
                PrometheusBuilder::new().build_recorder().handle()
            }
        };
        describe_metrics();
        handle
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// `GET /metrics` in the Prometheus text format.
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn describe_metrics() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "HTTP responses with a 4xx or 5xx status"
    );

    describe_counter!(
        ingestion::EVENTS_INGESTED,
        "Events accepted by /api/v1/events, by outcome"
    );
    describe_counter!(
        ingestion::TRIGGER_REGISTRATIONS,
        "Trigger registration attempts, by outcome"
    );
    describe_counter!(
        ingestion::API_KEY_REJECTIONS,
        "Requests rejected for a missing or unknown API key"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_handler_after_init() {
        init_metrics();
        let body = metrics_handler().await;
        assert!(!body.contains("not initialized"));
    }
}
