use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// `POST /api/v1/{endpointSlug}/triggers/{id}/registrations` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitializeTriggerBody {
    /// Registration key, unique per endpoint
    #[validate(length(min = 1, max = 255))]
    pub id: String,

    /// Trigger parameters; stored as given
    #[serde(default)]
    pub params: Value,

    #[validate(length(min = 1, max = 255))]
    pub account_id: Option<String>,

    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub id: Uuid,
    pub slug: String,
    pub url: String,
    pub environment_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicTrigger {
    pub id: Uuid,
    pub slug: String,
    pub endpoint_id: Uuid,
}

/// Full replacement of a registration's state for one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRegistration {
    pub environment_id: Uuid,
    pub endpoint_id: Uuid,
    pub dynamic_trigger_id: Uuid,
    pub key: String,
    pub params: Value,
    pub account_id: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRecord {
    pub id: Uuid,
    pub environment_id: Uuid,
    pub endpoint_id: Uuid,
    pub dynamic_trigger_id: Uuid,
    pub key: String,
    pub params: Value,
    pub account_id: Option<String>,
    pub metadata: Option<Value>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegistrationRecord {
    /// Never updated since insert.
    pub fn is_new(&self) -> bool {
        self.created_at == self.updated_at
    }
}

/// Canonical JSON projection of a registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRegistration {
    pub id: Uuid,
    pub key: String,
    pub endpoint_slug: String,
    /// Slug of the dynamic trigger
    pub dynamic_trigger_id: String,
    pub params: Value,
    pub account_id: Option<String>,
    pub metadata: Option<Value>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TriggerRegistration {
    pub fn new(record: RegistrationRecord, endpoint: &Endpoint, trigger: &DynamicTrigger) -> Self {
        Self {
            id: record.id,
            key: record.key,
            endpoint_slug: endpoint.slug.clone(),
            dynamic_trigger_id: trigger.slug.clone(),
            params: record.params,
            account_id: record.account_id,
            metadata: record.metadata,
            active: record.active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// What `register` did.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub registration: TriggerRegistration,
    pub created: bool,
}
