use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, messages};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("Environment {0} has no organization")]
    MissingOrganization(uuid::Uuid),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

impl From<sea_orm::DbErr> for EnvironmentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(format!("Database error: {}", err))
    }
}

/// Lookup faults are never reported as a bad key: an outage must surface as 500.
impl From<EnvironmentError> for AppError {
    fn from(err: EnvironmentError) -> Self {
        AppError::internal(messages::SOMETHING_WENT_WRONG, err)
    }
}

impl IntoResponse for EnvironmentError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
