use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::errors::handlers::get_only;
use axum_helpers::errors::responses::{
    InternalServerErrorResponse, MethodNotAllowedResponse, UnauthorizedResponse,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::auth::{AuthState, AuthenticatedEnv, Authenticator};
use crate::error::EnvironmentResult;
use crate::models::{AuthenticatedEnvironment, Organization, RuntimeEnvironmentType, WhoAmI};
use crate::repository::EnvironmentRepository;
use crate::service::EnvironmentService;

pub const TAG: &str = "environments";

/// OpenAPI documentation for the environments API
#[derive(OpenApi)]
#[openapi(
    paths(whoami),
    components(
        schemas(WhoAmI, AuthenticatedEnvironment, Organization, RuntimeEnvironmentType),
        responses(UnauthorizedResponse, MethodNotAllowedResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "API key introspection")
    )
)]
pub struct ApiDoc;

/// `/whoami`, authenticated by the service itself.
pub fn router<R: EnvironmentRepository + 'static>(service: Arc<EnvironmentService<R>>) -> Router {
    let authenticator: Arc<dyn Authenticator> = service.clone();

    Router::new()
        .route("/whoami", get(whoami::<R>).fallback(get_only))
        .with_state(AuthState::new(service, authenticator))
}

/// Describe the environment behind the API key
#[utoipa::path(
    get,
    path = "/whoami",
    tag = TAG,
    responses(
        (status = 200, description = "Authenticated environment", body = WhoAmI),
        (status = 401, response = UnauthorizedResponse),
        (status = 405, response = MethodNotAllowedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn whoami<R: EnvironmentRepository + 'static>(
    State(state): State<AuthState<Arc<EnvironmentService<R>>>>,
    AuthenticatedEnv(environment): AuthenticatedEnv,
) -> EnvironmentResult<Json<WhoAmI>> {
    let whoami = state.service.whoami(environment).await?;
    Ok(Json(whoami))
}
