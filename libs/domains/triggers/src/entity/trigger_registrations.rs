use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{RegistrationRecord, UpsertRegistration};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trigger_registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub environment_id: Uuid,
    pub endpoint_id: Uuid,
    pub dynamic_trigger_id: Uuid,
    pub key: String,
    pub params: Json,
    pub account_id: Option<String>,
    pub metadata: Option<Json>,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RegistrationRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            environment_id: model.environment_id,
            endpoint_id: model.endpoint_id,
            dynamic_trigger_id: model.dynamic_trigger_id,
            key: model.key,
            params: model.params,
            account_id: model.account_id,
            metadata: model.metadata,
            active: model.active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Insert shape of an upsert; on conflict only the replaced columns are taken.
impl From<UpsertRegistration> for ActiveModel {
    fn from(input: UpsertRegistration) -> Self {
        let now = Utc::now();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            environment_id: Set(input.environment_id),
            endpoint_id: Set(input.endpoint_id),
            dynamic_trigger_id: Set(input.dynamic_trigger_id),
            key: Set(input.key),
            params: Set(input.params),
            account_id: Set(input.account_id),
            metadata: Set(input.metadata),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

/// Columns overwritten when the scope already has a registration.
pub const REPLACED_COLUMNS: [Column; 6] = [
    Column::Key,
    Column::Params,
    Column::AccountId,
    Column::Metadata,
    Column::Active,
    Column::UpdatedAt,
];

/// Upsert target: one registration per (environment, endpoint, trigger).
pub const SCOPE_COLUMNS: [Column; 3] = [
    Column::EnvironmentId,
    Column::EndpointId,
    Column::DynamicTriggerId,
];
