use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::EventRecord;

/// Sea-ORM Entity for the event_records table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: String,
    pub name: String,
    pub payload: Json,
    pub context: Option<Json>,
    pub source: String,
    pub timestamp: DateTimeWithTimeZone,
    pub deliver_at: DateTimeWithTimeZone,
    pub delivered_at: Option<DateTimeWithTimeZone>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub external_account_id: Option<String>,
    pub environment_id: Uuid,
    pub organization_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EventRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            name: model.name,
            payload: model.payload,
            context: model.context,
            source: model.source,
            timestamp: model.timestamp.into(),
            deliver_at: model.deliver_at.into(),
            delivered_at: model.delivered_at.map(Into::into),
            cancelled_at: model.cancelled_at.map(Into::into),
            external_account_id: model.external_account_id,
            environment_id: model.environment_id,
            organization_id: model.organization_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<EventRecord> for ActiveModel {
    fn from(record: EventRecord) -> Self {
        ActiveModel {
            id: Set(record.id),
            event_id: Set(record.event_id),
            name: Set(record.name),
            payload: Set(record.payload),
            context: Set(record.context),
            source: Set(record.source),
            timestamp: Set(record.timestamp.into()),
            deliver_at: Set(record.deliver_at.into()),
            delivered_at: Set(record.delivered_at.map(Into::into)),
            cancelled_at: Set(record.cancelled_at.map(Into::into)),
            external_account_id: Set(record.external_account_id),
            environment_id: Set(record.environment_id),
            organization_id: Set(record.organization_id),
            created_at: Set(record.created_at.into()),
        }
    }
}
