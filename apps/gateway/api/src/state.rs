//! Shared application state.

use database::postgres::DatabaseConnection;

/// Cloned into the readiness handler and used to build the domain services.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
