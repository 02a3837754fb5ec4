use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{EventRecord, IngestedEvent};

/// Repository trait for event persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert `record` unless its `(event_id, environment_id)` is already
    /// stored; either way return the stored record.
    async fn create_or_get(&self, record: EventRecord) -> EventResult<IngestedEvent>;

    async fn find_by_event_id(&self, environment_id: Uuid, event_id: &str) -> EventResult<Option<EventRecord>>;

    /// Number of events stored for an environment
    async fn count(&self, environment_id: Uuid) -> EventResult<usize>;
}

/// In-memory implementation of EventRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<(Uuid, String), EventRecord>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create_or_get(&self, record: EventRecord) -> EventResult<IngestedEvent> {
        let mut events = self.events.write().await;
        let key = (record.environment_id, record.event_id.clone());

        if let Some(existing) = events.get(&key) {
            return Ok(IngestedEvent {
                record: existing.clone(),
                created: false,
            });
        }

        events.insert(key, record.clone());
        Ok(IngestedEvent {
            record,
            created: true,
        })
    }

    async fn find_by_event_id(&self, environment_id: Uuid, event_id: &str) -> EventResult<Option<EventRecord>> {
        let events = self.events.read().await;
        Ok(events.get(&(environment_id, event_id.to_string())).cloned())
    }

    async fn count(&self, environment_id: Uuid) -> EventResult<usize> {
        let events = self.events.read().await;
        Ok(events.keys().filter(|(env, _)| *env == environment_id).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawEvent;
    use chrono::Utc;
    use domain_environments::InMemoryEnvironmentRepository;
    use serde_json::json;

    #[tokio::test]
    async fn test_same_event_id_is_stored_once_per_environment() {
        let envs = InMemoryEnvironmentRepository::new();
        let dev = envs.seed("tr_dev_a", None).await;
        let other = envs.seed("tr_dev_b", None).await;
        let repo = InMemoryEventRepository::new();

        let event: RawEvent = serde_json::from_value(json!({"name": "a", "id": "evt_1"})).unwrap();

        let first = repo
            .create_or_get(EventRecord::new(&dev, event.clone(), None, Utc::now()))
            .await
            .unwrap();
        let second = repo
            .create_or_get(EventRecord::new(&dev, event.clone(), None, Utc::now()))
            .await
            .unwrap();
        let elsewhere = repo
            .create_or_get(EventRecord::new(&other, event, None, Utc::now()))
            .await
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.record.id, first.record.id);
        assert!(elsewhere.created);
        assert_eq!(repo.count(dev.id).await.unwrap(), 1);
        assert_eq!(repo.count(other.id).await.unwrap(), 1);
    }
}
