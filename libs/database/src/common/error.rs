/// Errors raised by connection management, as opposed to query errors
/// which surface as `sea_orm::DbErr` in the repositories.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}
