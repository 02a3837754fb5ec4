use domain_environments::AuthenticatedEnvironment;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{TriggerError, TriggerResult};
use crate::models::{InitializeTriggerBody, RegistrationOutcome, TriggerRegistration, UpsertRegistration};
use crate::repository::TriggerRepository;

/// Registers dynamic triggers on an environment's endpoints.
pub struct InitializeTriggerService<R: TriggerRepository> {
    repository: Arc<R>,
}

impl<R: TriggerRepository> Clone for InitializeTriggerService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TriggerRepository> InitializeTriggerService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create or replace the registration of `trigger_id` on `endpoint_slug`.
    ///
    /// Repeating a call with the same scope updates the existing row: the
    /// key, params, account and metadata are replaced, `created_at` is kept.
    #[instrument(
        skip(self, environment, body),
        fields(environment_id = %environment.id, key = %body.id)
    )]
    pub async fn register(
        &self,
        environment: &AuthenticatedEnvironment,
        endpoint_slug: &str,
        trigger_id: &str,
        body: InitializeTriggerBody,
    ) -> TriggerResult<RegistrationOutcome> {
        if endpoint_slug.is_empty() || trigger_id.is_empty() {
            return Err(TriggerError::EmptyScope);
        }

        let endpoint = self
            .repository
            .find_endpoint(environment.id, endpoint_slug)
            .await?
            .ok_or_else(|| TriggerError::EndpointNotFound(endpoint_slug.to_string()))?;

        let trigger = self
            .repository
            .find_dynamic_trigger(endpoint.id, trigger_id)
            .await?
            .ok_or_else(|| TriggerError::DynamicTriggerNotFound(trigger_id.to_string()))?;

        let holder = self
            .repository
            .find_registration_by_key(endpoint.id, &body.id)
            .await?;
        if let Some(existing) = holder.filter(|r| r.dynamic_trigger_id != trigger.id) {
            let other = self
                .repository
                .find_dynamic_trigger_by_id(existing.dynamic_trigger_id)
                .await?;
            return Err(match other {
                Some(other) => TriggerError::KeyInUse {
                    key: body.id,
                    trigger: other.slug,
                },
                None => TriggerError::KeyConflict(body.id),
            });
        }

        let record = self
            .repository
            .upsert_registration(UpsertRegistration {
                environment_id: environment.id,
                endpoint_id: endpoint.id,
                dynamic_trigger_id: trigger.id,
                key: body.id,
                params: body.params,
                account_id: body.account_id,
                metadata: body.metadata,
            })
            .await?;

        let created = record.is_new();
        info!(registration_id = %record.id, created, "Registered trigger");

        Ok(RegistrationOutcome {
            registration: TriggerRegistration::new(record, &endpoint, &trigger),
            created,
        })
    }
}
