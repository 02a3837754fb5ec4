use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, messages};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EventResult<T> = Result<T, EventError>;

/// Ingestion has no domain failures; anything reaching here is a 500.
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        AppError::internal(messages::FAILED_TO_CREATE_EVENT, err)
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
