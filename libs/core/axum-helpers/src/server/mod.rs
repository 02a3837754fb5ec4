//! Server bootstrap: router assembly, probes and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let probes = health_router(app_info!()).merge(ready_router);
//! let router = create_router::<ApiDoc>(api_routes, probes, &config.server);
//! create_production_app(router, &config.server, async move { close_postgres(db, "main").await }).await?;
//! ```

pub mod app;
pub mod cleanup;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router, serve_then_cleanup};
pub use cleanup::close_postgres;
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
