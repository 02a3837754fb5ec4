use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, messages};
use thiserror::Error;

/// Registration failures. Every variant except `Internal` is a domain
/// failure whose message is returned to the caller verbatim.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Endpoint slug and trigger id must not be empty")]
    EmptyScope,

    #[error("Endpoint not found: {0}")]
    EndpointNotFound(String),

    #[error("Dynamic trigger not found: {0}")]
    DynamicTriggerNotFound(String),

    #[error("Registration key '{key}' is already used by trigger {trigger}")]
    KeyInUse { key: String, trigger: String },

    #[error("Registration key '{0}' was claimed by a concurrent registration")]
    KeyConflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TriggerResult<T> = Result<T, TriggerError>;

impl TriggerError {
    /// Raised on purpose by the service, as opposed to an unexpected fault.
    pub fn is_domain_failure(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

impl From<sea_orm::DbErr> for TriggerError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(format!("Database error: {}", err))
    }
}

impl From<TriggerError> for AppError {
    fn from(err: TriggerError) -> Self {
        if err.is_domain_failure() {
            AppError::domain(err.to_string())
        } else {
            AppError::internal(messages::SOMETHING_WENT_WRONG, err)
        }
    }
}

impl IntoResponse for TriggerError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
