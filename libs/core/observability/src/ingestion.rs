//! Counters for the ingestion path.

use metrics::counter;

pub const EVENTS_INGESTED: &str = "events_ingested_total";
pub const TRIGGER_REGISTRATIONS: &str = "trigger_registrations_total";
pub const API_KEY_REJECTIONS: &str = "api_key_rejections_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new row was written
    Created,
    /// The request matched an existing row (idempotent replay or upsert update)
    Existing,
    /// A domain rule rejected the request
    Rejected,
    /// Unexpected failure
    Failed,
}

impl IngestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Existing => "existing",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

pub struct IngestionMetrics;

impl IngestionMetrics {
    pub fn event_ingested(outcome: IngestOutcome) {
        counter!(EVENTS_INGESTED, "outcome" => outcome.as_str()).increment(1);
    }

    pub fn trigger_registered(outcome: IngestOutcome) {
        counter!(TRIGGER_REGISTRATIONS, "outcome" => outcome.as_str()).increment(1);
    }

    pub fn api_key_rejected() {
        counter!(API_KEY_REJECTIONS).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_counters_are_labelled_by_outcome() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            IngestionMetrics::event_ingested(IngestOutcome::Created);
            IngestionMetrics::event_ingested(IngestOutcome::Created);
            IngestionMetrics::trigger_registered(IngestOutcome::Existing);
            IngestionMetrics::api_key_rejected();
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"events_ingested_total{outcome="created"} 2"#));
        assert!(rendered.contains(r#"trigger_registrations_total{outcome="existing"} 1"#));
        assert!(rendered.contains("api_key_rejections_total 1"));
    }
}
