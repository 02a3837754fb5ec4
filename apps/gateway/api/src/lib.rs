//! Gateway API
//!
//! Wires the domain crates into one HTTP service:
//!
//! - `GET  /api/v1/whoami`
//! - `POST /api/v1/events`
//! - `POST /api/v1/{endpoint_slug}/triggers/{id}/registrations`
//! - `GET  /health`, `/ready`, `/metrics`, `/swagger-ui`
//!
//! [`app`] assembles the public router from any API router and probe router,
//! so tests can run the full front door over in-memory repositories.

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use core_config::server::ServerConfig;

/// Public router: `apis` under `/api`, probes at the root, docs, front-door
/// middleware and the JSON 404 fallback.
pub fn app(apis: Router, probes: Router, server: &ServerConfig) -> Router {
    axum_helpers::create_router::<openapi::ApiDoc>(apis, probes, server)
}
