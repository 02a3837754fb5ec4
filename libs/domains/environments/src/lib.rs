//! Environments Domain
//!
//! Resolves API keys to runtime environments and answers `whoami`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ AuthenticatedEnv │  ← axum extractor, 401 on a missing/unknown key
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │  Authenticator   │  ← trait object injected at start-up
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ EnvironmentRepo  │  ← point lookup by API key (trait + implementations)
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_environments::{
//!     Authenticator, EnvironmentService, InMemoryEnvironmentRepository, handlers,
//! };
//!
//! let service = Arc::new(EnvironmentService::new(InMemoryEnvironmentRepository::new()));
//! let authenticator: Arc<dyn Authenticator> = service.clone();
//!
//! // `authenticator` is shared with the other domain routers
//! let router = handlers::router(service);
//! ```

pub mod auth;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use auth::{AuthState, AuthenticatedEnv, Authenticator, credential_from_headers, is_well_formed};
pub use error::{EnvironmentError, EnvironmentResult};
pub use handlers::ApiDoc;
pub use models::{AuthenticatedEnvironment, Organization, RuntimeEnvironmentType, WhoAmI};
pub use postgres::PgEnvironmentRepository;
pub use repository::{EnvironmentRepository, InMemoryEnvironmentRepository};
pub use service::EnvironmentService;
