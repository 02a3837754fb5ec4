use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{HeaderMap, request::Parts},
    routing::post,
};
use axum_helpers::errors::handlers::post_only;
use axum_helpers::errors::responses::{
    BadRequestResponse, InternalServerErrorResponse, MethodNotAllowedResponse,
    UnauthorizedResponse,
};
use axum_helpers::{AppError, AuditEvent, AuditOutcome, messages, parse_and_validate};
use domain_environments::{AuthState, AuthenticatedEnv, Authenticator};
use observability::{IngestOutcome, IngestionMetrics};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;
use validator::Validate;

use crate::models::{InitializeTriggerBody, TriggerRegistration};
use crate::repository::TriggerRepository;
use crate::service::InitializeTriggerService;

pub const TAG: &str = "triggers";

type TriggersState<R> = AuthState<Arc<InitializeTriggerService<R>>>;

/// OpenAPI documentation for the triggers API
#[derive(OpenApi)]
#[openapi(
    paths(register_trigger),
    components(
        schemas(InitializeTriggerBody, TriggerRegistration),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            MethodNotAllowedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Dynamic trigger registration")
    )
)]
pub struct ApiDoc;

/// `/{endpoint_slug}/triggers/{id}/registrations`: POST only, authenticated.
pub fn router<R: TriggerRepository + 'static>(
    service: InitializeTriggerService<R>,
    authenticator: Arc<dyn Authenticator>,
) -> Router {
    Router::new()
        .route(
            "/{endpoint_slug}/triggers/{id}/registrations",
            post(register_trigger::<R>).fallback(post_only),
        )
        .with_state(AuthState::new(Arc::new(service), authenticator))
}

/// Path parameters of the registration route.
///
/// Rejects with 400 `{"error":"Invalid params"}` before authentication runs.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationPath {
    #[validate(length(min = 1, max = 255))]
    pub endpoint_slug: String,
    #[validate(length(min = 1, max = 255))]
    pub id: String,
}

impl<S: Send + Sync> FromRequestParts<S> for RegistrationPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<RegistrationPath>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::info!(error = %e, "Invalid params");
                AppError::invalid_params()
            })?;

        params.validate().map_err(|e| {
            tracing::info!(error = %e, "Invalid params");
            AppError::invalid_params()
        })?;

        Ok(params)
    }
}

/// Register a dynamic trigger
///
/// Creates the registration, or replaces it when the trigger is already
/// registered on this endpoint in this environment.
#[utoipa::path(
    post,
    path = "/{endpoint_slug}/triggers/{id}/registrations",
    tag = TAG,
    params(
        ("endpoint_slug" = String, Path, description = "Endpoint slug"),
        ("id" = String, Path, description = "Dynamic trigger id")
    ),
    request_body = InitializeTriggerBody,
    responses(
        (status = 200, description = "Registration created or replaced", body = TriggerRegistration),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 405, response = MethodNotAllowedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register_trigger<R: TriggerRepository + 'static>(
    State(state): State<TriggersState<R>>,
    path: RegistrationPath,
    AuthenticatedEnv(environment): AuthenticatedEnv,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TriggerRegistration>, AppError> {
    tracing::info!(endpoint_slug = %path.endpoint_slug, trigger_id = %path.id, "Initializing trigger");

    let body: InitializeTriggerBody = parse_and_validate(&body).map_err(|e| {
        tracing::info!(error = %e, "Invalid request body");
        IngestionMetrics::trigger_registered(IngestOutcome::Rejected);
        AppError::bad_request(messages::INVALID_REQUEST_BODY)
    })?;

    let outcome = match state
        .service
        .register(&environment, &path.endpoint_slug, &path.id, body)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "Error initializing trigger");
            IngestionMetrics::trigger_registered(if e.is_domain_failure() {
                IngestOutcome::Rejected
            } else {
                IngestOutcome::Failed
            });
            return Err(e.into());
        }
    };

    IngestionMetrics::trigger_registered(if outcome.created {
        IngestOutcome::Created
    } else {
        IngestOutcome::Existing
    });

    AuditEvent::new(
        Some(environment.id.to_string()),
        "trigger.register",
        AuditOutcome::Success,
    )
    .with_resource(format!(
        "endpoint:{}/trigger:{}",
        path.endpoint_slug, path.id
    ))
    .with_request_headers(&headers)
    .with_details(json!({
        "registration_id": outcome.registration.id,
        "key": outcome.registration.key,
        "created": outcome.created,
    }))
    .log();

    Ok(Json(outcome.registration))
}
