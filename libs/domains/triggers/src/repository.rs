use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TriggerError, TriggerResult};
use crate::models::{DynamicTrigger, Endpoint, RegistrationRecord, UpsertRegistration};

/// Repository trait for endpoints, dynamic triggers and registrations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriggerRepository: Send + Sync {
    async fn find_endpoint(&self, environment_id: Uuid, slug: &str) -> TriggerResult<Option<Endpoint>>;

    async fn find_dynamic_trigger(&self, endpoint_id: Uuid, slug: &str) -> TriggerResult<Option<DynamicTrigger>>;

    async fn find_dynamic_trigger_by_id(&self, id: Uuid) -> TriggerResult<Option<DynamicTrigger>>;

    async fn find_registration_by_key(&self, endpoint_id: Uuid, key: &str) -> TriggerResult<Option<RegistrationRecord>>;

    /// Create or fully replace the registration of
    /// `(environment, endpoint, dynamic trigger)`. Concurrent calls on the
    /// same scope are serialized by the store.
    async fn upsert_registration(&self, input: UpsertRegistration) -> TriggerResult<RegistrationRecord>;

    /// Registrations stored for a dynamic trigger
    async fn count_registrations(&self, dynamic_trigger_id: Uuid) -> TriggerResult<usize>;
}

type Scope = (Uuid, Uuid, Uuid);

/// In-memory implementation of TriggerRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTriggerRepository {
    endpoints: Arc<RwLock<HashMap<Uuid, Endpoint>>>,
    triggers: Arc<RwLock<HashMap<Uuid, DynamicTrigger>>>,
    registrations: Arc<RwLock<HashMap<Scope, RegistrationRecord>>>,
}

impl InMemoryTriggerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_endpoint(&self, environment_id: Uuid, slug: &str) -> Endpoint {
        let endpoint = Endpoint {
            id: Uuid::now_v7(),
            slug: slug.to_string(),
            url: format!("https://example.test/{}", slug),
            environment_id,
        };
        self.endpoints.write().await.insert(endpoint.id, endpoint.clone());
        endpoint
    }

    pub async fn add_dynamic_trigger(&self, endpoint_id: Uuid, slug: &str) -> DynamicTrigger {
        let trigger = DynamicTrigger {
            id: Uuid::now_v7(),
            slug: slug.to_string(),
            endpoint_id,
        };
        self.triggers.write().await.insert(trigger.id, trigger.clone());
        trigger
    }
}

#[async_trait]
impl TriggerRepository for InMemoryTriggerRepository {
    async fn find_endpoint(&self, environment_id: Uuid, slug: &str) -> TriggerResult<Option<Endpoint>> {
        let endpoints = self.endpoints.read().await;
        Ok(endpoints
            .values()
            .find(|e| e.environment_id == environment_id && e.slug == slug)
            .cloned())
    }

    async fn find_dynamic_trigger(&self, endpoint_id: Uuid, slug: &str) -> TriggerResult<Option<DynamicTrigger>> {
        let triggers = self.triggers.read().await;
        Ok(triggers
            .values()
            .find(|t| t.endpoint_id == endpoint_id && t.slug == slug)
            .cloned())
    }

    async fn find_dynamic_trigger_by_id(&self, id: Uuid) -> TriggerResult<Option<DynamicTrigger>> {
        Ok(self.triggers.read().await.get(&id).cloned())
    }

    async fn find_registration_by_key(&self, endpoint_id: Uuid, key: &str) -> TriggerResult<Option<RegistrationRecord>> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .values()
            .find(|r| r.endpoint_id == endpoint_id && r.key == key)
            .cloned())
    }

    async fn upsert_registration(&self, input: UpsertRegistration) -> TriggerResult<RegistrationRecord> {
        let mut registrations = self.registrations.write().await;
        let scope = (input.environment_id, input.endpoint_id, input.dynamic_trigger_id);

        // Mirrors the (endpoint, key) unique index
        let key_taken = registrations
            .iter()
            .any(|(s, r)| *s != scope && r.endpoint_id == input.endpoint_id && r.key == input.key);
        if key_taken {
            return Err(TriggerError::KeyConflict(input.key));
        }

        let now = Utc::now();
        let (id, created_at) = match registrations.get(&scope) {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::now_v7(), now),
        };

        let record = RegistrationRecord {
            id,
            environment_id: input.environment_id,
            endpoint_id: input.endpoint_id,
            dynamic_trigger_id: input.dynamic_trigger_id,
            key: input.key,
            params: input.params,
            account_id: input.account_id,
            metadata: input.metadata,
            active: true,
            created_at,
            updated_at: now,
        };
        registrations.insert(scope, record.clone());
        Ok(record)
    }

    async fn count_registrations(&self, dynamic_trigger_id: Uuid) -> TriggerResult<usize> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .keys()
            .filter(|(_, _, trigger)| *trigger == dynamic_trigger_id)
            .count())
    }
}
