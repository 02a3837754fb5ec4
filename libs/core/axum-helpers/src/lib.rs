//! # Axum Helpers
//!
//! HTTP plumbing shared by the gateway's domain crates.
//!
//! - **[`errors`]**: [`AppError`] and the exact `{"error"}` / `{"message"}` wire bodies
//! - **[`validation`]**: two-stage body pipeline (parse, then validate)
//! - **[`middleware`]**: HSTS, hardening headers, trailing-slash redirect
//! - **[`server`]**: router assembly, health probe, graceful shutdown
//! - **[`audit`]**: audit events on the `audit` tracing target

pub mod audit;
pub mod errors;
pub mod middleware;
pub mod server;
pub mod validation;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_postgres, create_production_app,
    create_router, health_router, run_health_checks, serve_then_cleanup, shutdown_signal,
};

pub use middleware::{security_headers, trailing_slash_redirect};

pub use errors::{AppError, ErrorCode, ErrorResponse, ValidationErrorResponse, messages};

pub use validation::{BodyError, Issue, Issues, parse_and_validate, parse_json, validate};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
