use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;

/// Deployment mode of a runtime environment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "runtime_environment_type"
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeEnvironmentType {
    #[sea_orm(string_value = "PRODUCTION")]
    Production,
    #[sea_orm(string_value = "STAGING")]
    Staging,
    #[default]
    #[sea_orm(string_value = "DEVELOPMENT")]
    Development,
    #[sea_orm(string_value = "PREVIEW")]
    Preview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The environment an API key resolved to, with its organization.
///
/// Everything downstream of authentication is scoped by `id` and
/// `organization_id`; nothing the caller sends can override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedEnvironment {
    pub id: Uuid,
    pub slug: String,
    pub api_key: String,
    #[serde(rename = "type")]
    pub environment_type: RuntimeEnvironmentType,
    pub organization_id: Uuid,
    pub project_id: Uuid,
    pub org_member_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub organization: Organization,
}

/// `GET /api/v1/whoami` body: the environment plus the owning member's user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    #[serde(flatten)]
    pub environment: AuthenticatedEnvironment,
    pub user_id: Option<Uuid>,
}
