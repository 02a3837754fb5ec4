use async_trait::async_trait;
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::instrument;

use crate::auth::{Authenticator, credential_from_headers, is_well_formed};
use crate::error::EnvironmentResult;
use crate::models::{AuthenticatedEnvironment, WhoAmI};
use crate::repository::EnvironmentRepository;

/// Service layer for API key resolution and `whoami`
pub struct EnvironmentService<R: EnvironmentRepository> {
    repository: Arc<R>,
}

impl<R: EnvironmentRepository> Clone for EnvironmentService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: EnvironmentRepository> EnvironmentService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Resolve an API key. Malformed keys never reach the repository.
    #[instrument(skip_all)]
    pub async fn authenticate_api_key(&self, api_key: &str) -> EnvironmentResult<Option<AuthenticatedEnvironment>> {
        if !is_well_formed(api_key) {
            tracing::debug!("Rejected malformed API key");
            return Ok(None);
        }

        let environment = self.repository.find_by_api_key(api_key).await?;
        if let Some(env) = &environment {
            tracing::debug!(environment_id = %env.id, "Resolved API key");
        }
        Ok(environment)
    }

    #[instrument(skip_all, fields(environment_id = %environment.id))]
    pub async fn whoami(&self, environment: AuthenticatedEnvironment) -> EnvironmentResult<WhoAmI> {
        let user_id = match environment.org_member_id {
            Some(member_id) => self.repository.find_member_user_id(member_id).await?,
            None => None,
        };

        Ok(WhoAmI {
            environment,
            user_id,
        })
    }
}

#[async_trait]
impl<R: EnvironmentRepository + 'static> Authenticator for EnvironmentService<R> {
    async fn authenticate(&self, headers: &HeaderMap) -> EnvironmentResult<Option<AuthenticatedEnvironment>> {
        match credential_from_headers(headers) {
            Some(api_key) => self.authenticate_api_key(api_key).await,
            None => Ok(None),
        }
    }
}
