use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{org_members, organizations, runtime_environments},
    error::{EnvironmentError, EnvironmentResult},
    models::AuthenticatedEnvironment,
    repository::EnvironmentRepository,
};

pub struct PgEnvironmentRepository {
    base: BaseRepository<runtime_environments::Entity>,
    members: BaseRepository<org_members::Entity>,
}

impl PgEnvironmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            members: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl EnvironmentRepository for PgEnvironmentRepository {
    async fn find_by_api_key(&self, api_key: &str) -> EnvironmentResult<Option<AuthenticatedEnvironment>> {
        let found = runtime_environments::Entity::find()
            .filter(runtime_environments::Column::ApiKey.eq(api_key))
            .find_also_related(organizations::Entity)
            .one(self.base.db())
            .await?;

        match found {
            None => Ok(None),
            Some((environment, Some(organization))) => {
                Ok(Some(environment.into_authenticated(organization)))
            }
            Some((environment, None)) => Err(EnvironmentError::MissingOrganization(environment.id)),
        }
    }

    async fn find_member_user_id(&self, org_member_id: Uuid) -> EnvironmentResult<Option<Uuid>> {
        let member = self.members.find_by_id(org_member_id).await?;
        Ok(member.map(|m| m.user_id))
    }
}
