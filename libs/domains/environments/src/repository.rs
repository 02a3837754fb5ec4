use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::EnvironmentResult;
use crate::models::{AuthenticatedEnvironment, Organization, RuntimeEnvironmentType};

/// Read-only access to runtime environments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnvironmentRepository: Send + Sync {
    /// Point lookup of the environment owning `api_key`.
    async fn find_by_api_key(&self, api_key: &str) -> EnvironmentResult<Option<AuthenticatedEnvironment>>;

    /// User behind an organization member.
    async fn find_member_user_id(&self, org_member_id: Uuid) -> EnvironmentResult<Option<Uuid>>;
}

/// In-memory implementation of EnvironmentRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEnvironmentRepository {
    environments: Arc<RwLock<HashMap<String, AuthenticatedEnvironment>>>,
    members: Arc<RwLock<HashMap<Uuid, Uuid>>>,
}

impl InMemoryEnvironmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, environment: AuthenticatedEnvironment) {
        self.environments
            .write()
            .await
            .insert(environment.api_key.clone(), environment);
    }

    pub async fn insert_member(&self, org_member_id: Uuid, user_id: Uuid) {
        self.members.write().await.insert(org_member_id, user_id);
    }

    /// Register a development environment for `api_key` under a fresh
    /// organization. With `user_id`, a member owning the environment is
    /// created as well.
    pub async fn seed(&self, api_key: &str, user_id: Option<Uuid>) -> AuthenticatedEnvironment {
        let now = Utc::now();
        let organization = Organization {
            id: Uuid::now_v7(),
            slug: format!("org-{}", Uuid::now_v7().simple()),
            title: "Development".to_string(),
            created_at: now,
            updated_at: now,
        };

        let org_member_id = match user_id {
            Some(user_id) => {
                let member_id = Uuid::now_v7();
                self.insert_member(member_id, user_id).await;
                Some(member_id)
            }
            None => None,
        };

        let environment = AuthenticatedEnvironment {
            id: Uuid::now_v7(),
            slug: "dev".to_string(),
            api_key: api_key.to_string(),
            environment_type: RuntimeEnvironmentType::Development,
            organization_id: organization.id,
            project_id: Uuid::now_v7(),
            org_member_id,
            created_at: now,
            updated_at: now,
            organization,
        };

        self.insert(environment.clone()).await;
        environment
    }
}

#[async_trait]
impl EnvironmentRepository for InMemoryEnvironmentRepository {
    async fn find_by_api_key(&self, api_key: &str) -> EnvironmentResult<Option<AuthenticatedEnvironment>> {
        Ok(self.environments.read().await.get(api_key).cloned())
    }

    async fn find_member_user_id(&self, org_member_id: Uuid) -> EnvironmentResult<Option<Uuid>> {
        Ok(self.members.read().await.get(&org_member_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_and_lookup() {
        let repo = InMemoryEnvironmentRepository::new();
        let user_id = Uuid::now_v7();
        let seeded = repo.seed("tr_dev_abc", Some(user_id)).await;

        let found = repo.find_by_api_key("tr_dev_abc").await.unwrap().unwrap();
        assert_eq!(found.id, seeded.id);
        assert_eq!(found.organization.id, found.organization_id);

        let member = found.org_member_id.unwrap();
        assert_eq!(repo.find_member_user_id(member).await.unwrap(), Some(user_id));
    }

    #[tokio::test]
    async fn test_unknown_key_is_none() {
        let repo = InMemoryEnvironmentRepository::new();
        repo.seed("tr_dev_abc", None).await;

        assert!(repo.find_by_api_key("tr_dev_abd").await.unwrap().is_none());
    }
}
