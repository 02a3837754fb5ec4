use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, SqlErr};
use uuid::Uuid;

use crate::{
    entity::{dynamic_triggers, endpoints, trigger_registrations},
    error::{TriggerError, TriggerResult},
    models::{DynamicTrigger, Endpoint, RegistrationRecord, UpsertRegistration},
    repository::TriggerRepository,
};

pub struct PgTriggerRepository {
    base: BaseRepository<trigger_registrations::Entity>,
}

impl PgTriggerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl TriggerRepository for PgTriggerRepository {
    async fn find_endpoint(&self, environment_id: Uuid, slug: &str) -> TriggerResult<Option<Endpoint>> {
        let model = endpoints::Entity::find()
            .filter(endpoints::Column::EnvironmentId.eq(environment_id))
            .filter(endpoints::Column::Slug.eq(slug))
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_dynamic_trigger(&self, endpoint_id: Uuid, slug: &str) -> TriggerResult<Option<DynamicTrigger>> {
        let model = dynamic_triggers::Entity::find()
            .filter(dynamic_triggers::Column::EndpointId.eq(endpoint_id))
            .filter(dynamic_triggers::Column::Slug.eq(slug))
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_dynamic_trigger_by_id(&self, id: Uuid) -> TriggerResult<Option<DynamicTrigger>> {
        let model = dynamic_triggers::Entity::find_by_id(id).one(self.base.db()).await?;

        Ok(model.map(Into::into))
    }

    async fn find_registration_by_key(&self, endpoint_id: Uuid, key: &str) -> TriggerResult<Option<RegistrationRecord>> {
        let model = trigger_registrations::Entity::find()
            .filter(trigger_registrations::Column::EndpointId.eq(endpoint_id))
            .filter(trigger_registrations::Column::Key.eq(key))
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn upsert_registration(&self, input: UpsertRegistration) -> TriggerResult<RegistrationRecord> {
        let key = input.key.clone();

        let model = self
            .base
            .upsert(
                input.into(),
                trigger_registrations::SCOPE_COLUMNS,
                trigger_registrations::REPLACED_COLUMNS,
            )
            .await
            .map_err(|e| match e.sql_err() {
                // Lost a race on the (endpoint, key) index
                Some(SqlErr::UniqueConstraintViolation(_)) => TriggerError::KeyConflict(key),
                _ => e.into(),
            })?;

        tracing::info!(registration_id = %model.id, "Upserted trigger registration");
        Ok(model.into())
    }

    async fn count_registrations(&self, dynamic_trigger_id: Uuid) -> TriggerResult<usize> {
        let count = trigger_registrations::Entity::find()
            .filter(trigger_registrations::Column::DynamicTriggerId.eq(dynamic_trigger_id))
            .count(self.base.db())
            .await?;

        Ok(count as usize)
    }
}
