use crate::models::{AuthenticatedEnvironment, RuntimeEnvironmentType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "runtime_environments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub slug: String,
    #[sea_orm(unique)]
    pub api_key: String,
    #[sea_orm(column_name = "type")]
    pub environment_type: RuntimeEnvironmentType,
    pub organization_id: Uuid,
    pub project_id: Uuid,
    pub org_member_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organization,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_authenticated(self, organization: super::organizations::Model) -> AuthenticatedEnvironment {
        AuthenticatedEnvironment {
            id: self.id,
            slug: self.slug,
            api_key: self.api_key,
            environment_type: self.environment_type,
            organization_id: self.organization_id,
            project_id: self.project_id,
            org_member_id: self.org_member_id,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            organization: organization.into(),
        }
    }
}
