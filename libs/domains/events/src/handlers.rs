use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use axum_helpers::errors::handlers::post_only;
use axum_helpers::errors::responses::{
    InternalServerErrorResponse, MethodNotAllowedResponse, UnauthorizedResponse,
    UnprocessableEntityResponse,
};
use axum_helpers::{AppError, AuditEvent, AuditOutcome, parse_and_validate};
use domain_environments::{AuthState, AuthenticatedEnv, Authenticator};
use observability::{IngestOutcome, IngestionMetrics};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{ApiEventLog, RawEvent, SendEventBody, SendEventOptions};
use crate::repository::EventRepository;
use crate::service::IngestEventService;

pub const TAG: &str = "events";

type EventsState<R> = AuthState<Arc<IngestEventService<R>>>;

/// OpenAPI documentation for the events API
#[derive(OpenApi)]
#[openapi(
    paths(send_event),
    components(
        schemas(SendEventBody, RawEvent, SendEventOptions, ApiEventLog),
        responses(
            UnauthorizedResponse,
            MethodNotAllowedResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Event ingestion")
    )
)]
pub struct ApiDoc;

/// `/events`: POST only, authenticated.
pub fn router<R: EventRepository + 'static>(
    service: IngestEventService<R>,
    authenticator: Arc<dyn Authenticator>,
) -> Router {
    Router::new()
        .route("/events", post(send_event::<R>).fallback(post_only))
        .with_state(AuthState::new(Arc::new(service), authenticator))
}

/// Send an event
///
/// Both a body that is not JSON and one that fails the schema answer 422
/// with the rendered issue list.
#[utoipa::path(
    post,
    path = "/events",
    tag = TAG,
    request_body = SendEventBody,
    responses(
        (status = 200, description = "Event recorded", body = ApiEventLog),
        (status = 401, response = UnauthorizedResponse),
        (status = 405, response = MethodNotAllowedResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn send_event<R: EventRepository + 'static>(
    State(state): State<EventsState<R>>,
    AuthenticatedEnv(environment): AuthenticatedEnv,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiEventLog>, AppError> {
    let SendEventBody { event, options } = parse_and_validate(&body).map_err(|e| {
        IngestionMetrics::event_ingested(IngestOutcome::Rejected);
        AppError::UnprocessableEntity(e.into_issues().to_string())
    })?;

    let ingested = state
        .service
        .ingest(&environment, event, options)
        .await
        .inspect_err(|_| IngestionMetrics::event_ingested(IngestOutcome::Failed))?;

    IngestionMetrics::event_ingested(if ingested.created {
        IngestOutcome::Created
    } else {
        IngestOutcome::Existing
    });

    AuditEvent::new(
        Some(environment.id.to_string()),
        "event.ingest",
        AuditOutcome::Success,
    )
    .with_resource(format!("event:{}", ingested.record.event_id))
    .with_request_headers(&headers)
    .with_details(json!({
        "name": ingested.record.name,
        "created": ingested.created,
        "organization_id": environment.organization_id,
    }))
    .log();

    Ok(Json(ingested.record.into()))
}
