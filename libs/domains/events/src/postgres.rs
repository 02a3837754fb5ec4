use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity,
    error::{EventError, EventResult},
    models::{EventRecord, IngestedEvent},
    repository::EventRepository,
};

pub struct PgEventRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create_or_get(&self, record: EventRecord) -> EventResult<IngestedEvent> {
        let environment_id = record.environment_id;
        let event_id = record.event_id.clone();

        // ON CONFLICT DO NOTHING on the idempotency key, then read back the winner
        let created = self
            .base
            .insert_if_absent(
                record.into(),
                [entity::Column::EventId, entity::Column::EnvironmentId],
            )
            .await?;

        let stored = self
            .find_by_event_id(environment_id, &event_id)
            .await?
            .ok_or_else(|| EventError::Internal(format!("Event {} missing after insert", event_id)))?;

        Ok(IngestedEvent {
            record: stored,
            created,
        })
    }

    async fn find_by_event_id(&self, environment_id: Uuid, event_id: &str) -> EventResult<Option<EventRecord>> {
        let model = entity::Entity::find()
            .filter(entity::Column::EnvironmentId.eq(environment_id))
            .filter(entity::Column::EventId.eq(event_id))
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn count(&self, environment_id: Uuid) -> EventResult<usize> {
        let count = entity::Entity::find()
            .filter(entity::Column::EnvironmentId.eq(environment_id))
            .count(self.base.db())
            .await?;

        Ok(count as usize)
    }
}
