use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Gateway API",
        version = "0.1.0",
        description = "Authenticated event ingestion and dynamic trigger registration"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1", api = domain_environments::ApiDoc),
        (path = "/v1", api = domain_events::ApiDoc),
        (path = "/v1", api = domain_triggers::ApiDoc)
    )
)]
pub struct ApiDoc;
