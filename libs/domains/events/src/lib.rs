//! Events Domain
//!
//! Accepts events from authenticated callers and records them, append-only,
//! for a downstream delivery worker.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /v1/events, 405/401/422/500 mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← attribution, delivery time, non-cancellable write
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← insert-or-get on (event id, environment)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_environments::{Authenticator, EnvironmentService, InMemoryEnvironmentRepository};
//! use domain_events::{IngestEventService, InMemoryEventRepository, handlers};
//!
//! let authenticator: Arc<dyn Authenticator> =
//!     Arc::new(EnvironmentService::new(InMemoryEnvironmentRepository::new()));
//! let service = IngestEventService::new(InMemoryEventRepository::new());
//! let router = handlers::router(service, authenticator);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    ApiEventLog, EventRecord, IngestedEvent, RawEvent, SendEventBody, SendEventOptions,
};
pub use postgres::PgEventRepository;
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::IngestEventService;
