//! Triggers Domain
//!
//! Registers dynamic triggers on an environment's endpoints with
//! create-or-replace semantics keyed by (environment, endpoint, trigger).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /v1/{endpoint_slug}/triggers/{id}/registrations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← endpoint/trigger resolution, key ownership
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← lookups + upsert (trait + implementations)
//! └─────────────┘
//! ```
//!
//! Domain failures ([`TriggerError::is_domain_failure`]) answer 400 with their
//! message; anything else answers 500 with a generic message.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TriggerError, TriggerResult};
pub use handlers::ApiDoc;
pub use models::{
    DynamicTrigger, Endpoint, InitializeTriggerBody, RegistrationOutcome, RegistrationRecord,
    TriggerRegistration, UpsertRegistration,
};
pub use postgres::PgTriggerRepository;
pub use repository::{InMemoryTriggerRepository, TriggerRepository};
pub use service::InitializeTriggerService;
