//! Event ingestion service

use chrono::Utc;
use domain_environments::AuthenticatedEnvironment;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{EventError, EventResult};
use crate::models::{EventRecord, IngestedEvent, RawEvent, SendEventOptions};
use crate::repository::EventRepository;

/// Attributes validated events to an environment and records them.
pub struct IngestEventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> Clone for IngestEventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: EventRepository + 'static> IngestEventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Persist `event` for `environment` and return the stored record.
    ///
    /// The write runs on its own task and is awaited, so it completes even
    /// when the caller goes away mid-request. Returns only after the record
    /// is durable. Not retried.
    #[instrument(
        skip(self, environment, event, options),
        fields(environment_id = %environment.id, event_name = %event.name)
    )]
    pub async fn ingest(
        &self,
        environment: &AuthenticatedEnvironment,
        event: RawEvent,
        options: Option<SendEventOptions>,
    ) -> EventResult<IngestedEvent> {
        let record = EventRecord::new(environment, event, options.as_ref(), Utc::now());
        let repository = Arc::clone(&self.repository);

        let ingested = tokio::spawn(async move { repository.create_or_get(record).await })
            .await
            .map_err(|e| EventError::Internal(format!("Ingest task failed: {}", e)))??;

        if ingested.created {
            info!(event_id = %ingested.record.event_id, "Event ingested");
        } else {
            info!(event_id = %ingested.record.event_id, "Event id already ingested, returning stored record");
        }

        Ok(ingested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryEventRepository, MockEventRepository};
    use domain_environments::InMemoryEnvironmentRepository;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawEvent {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_scopes_record_to_environment() {
        let env = InMemoryEnvironmentRepository::new().seed("tr_dev_svc", None).await;

        let mut mock_repo = MockEventRepository::new();
        let env_id = env.id;
        mock_repo
            .expect_create_or_get()
            .withf(move |record| record.environment_id == env_id && record.name == "user.signup")
            .times(1)
            .returning(|record| {
                Ok(IngestedEvent {
                    record,
                    created: true,
                })
            });

        let service = IngestEventService::new(mock_repo);
        let ingested = service
            .ingest(&env, raw(json!({"name": "user.signup", "payload": {"id": 1}})), None)
            .await
            .unwrap();

        assert!(ingested.created);
        assert_eq!(ingested.record.payload, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_persistence_failure_is_internal() {
        let env = InMemoryEnvironmentRepository::new().seed("tr_dev_fail", None).await;

        let mut mock_repo = MockEventRepository::new();
        mock_repo
            .expect_create_or_get()
            .returning(|_| Err(EventError::Internal("connection reset".into())));

        let service = IngestEventService::new(mock_repo);
        let result = service.ingest(&env, raw(json!({"name": "x"})), None).await;

        assert!(matches!(result, Err(EventError::Internal(_))));
    }

    #[tokio::test]
    async fn test_repeat_event_id_returns_first_record() {
        let env = InMemoryEnvironmentRepository::new().seed("tr_dev_idem", None).await;
        let service = IngestEventService::new(InMemoryEventRepository::new());

        let first = service
            .ingest(&env, raw(json!({"name": "a", "id": "evt_9", "payload": 1})), None)
            .await
            .unwrap();
        let second = service
            .ingest(&env, raw(json!({"name": "a", "id": "evt_9", "payload": 2})), None)
            .await
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.record.payload, json!(1));
    }

    #[tokio::test]
    async fn test_ingest_completes_when_caller_is_dropped() {
        let env = InMemoryEnvironmentRepository::new().seed("tr_dev_drop", None).await;
        let repo = InMemoryEventRepository::new();
        let service = IngestEventService::new(repo.clone());

        // Poll the ingest once so the write task is spawned, then drop it
        let ingest = service.ingest(&env, raw(json!({"name": "late", "id": "evt_late"})), None);
        let _ = tokio::time::timeout(std::time::Duration::from_nanos(1), ingest).await;

        for _ in 0..50 {
            if repo.count(env.id).await.unwrap() == 1 {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("spawned write did not complete");
    }
}
