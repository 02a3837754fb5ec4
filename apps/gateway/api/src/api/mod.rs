use axum::{Router, middleware, routing::get};
use core_config::AppInfo;
use domain_environments::{
    Authenticator, EnvironmentRepository, EnvironmentService, PgEnvironmentRepository,
};
use domain_events::{EventRepository, IngestEventService, PgEventRepository};
use domain_triggers::{InitializeTriggerService, PgTriggerRepository, TriggerRepository};
use std::sync::Arc;

use crate::state::AppState;

pub mod health;

/// Versioned API routes without the `/api` prefix, which `create_router` adds.
///
/// The environment service doubles as the authenticator shared by every
/// authenticated route.
pub fn v1_router<E, V, T>(
    environments: EnvironmentService<E>,
    events: IngestEventService<V>,
    triggers: InitializeTriggerService<T>,
) -> Router
where
    E: EnvironmentRepository + 'static,
    V: EventRepository + 'static,
    T: TriggerRepository + 'static,
{
    let environments = Arc::new(environments);
    let authenticator: Arc<dyn Authenticator> = environments.clone();

    let v1 = Router::new()
        .merge(domain_environments::handlers::router(environments))
        .merge(domain_events::handlers::router(events, authenticator.clone()))
        .merge(domain_triggers::handlers::router(triggers, authenticator))
        .route_layer(middleware::from_fn(observability::metrics_middleware));

    Router::new().nest("/v1", v1)
}

/// Postgres-backed routes for the running server.
pub fn routes(state: &AppState) -> Router {
    v1_router(
        EnvironmentService::new(PgEnvironmentRepository::new(state.db.clone())),
        IngestEventService::new(PgEventRepository::new(state.db.clone())),
        InitializeTriggerService::new(PgTriggerRepository::new(state.db.clone())),
    )
}

/// Liveness and metrics probes, served at the root.
pub fn probes(app_info: AppInfo) -> Router {
    Router::new()
        .merge(axum_helpers::health_router(app_info))
        .route("/metrics", get(observability::metrics_handler))
}

/// `/ready` with the database check; stateful, merged next to [`probes`].
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
