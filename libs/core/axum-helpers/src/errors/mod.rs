pub mod codes;
pub mod handlers;
pub mod messages;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every gateway error except schema violations on `/events`.
///
/// ```json
/// { "error": "Invalid or Missing API key" }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of a 422 schema violation: the rendered list of field issues.
///
/// ```json
/// { "message": "Code: too_small ~ Path: event.name ~ Message: ..." }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ValidationErrorResponse {
    pub message: String,
}

/// HTTP-facing error. Every failure is converted into one of these at the
/// gateway boundary; nothing propagates past it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// Request shape or domain rejection; the message is returned verbatim.
    #[error("Bad Request: {message}")]
    BadRequest { message: String, code: ErrorCode },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Schema violation, rendered as `{"message": ..}`.
    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    /// Unexpected fault. Only `message` reaches the client; `detail` is logged.
    #[error("Internal Server Error: {detail}")]
    Internal { message: String, detail: String },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: ErrorCode::ValidationError,
        }
    }

    /// A named business-rule rejection raised by a service.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: ErrorCode::DomainRejected,
        }
    }

    pub fn invalid_params() -> Self {
        Self::BadRequest {
            message: messages::INVALID_PARAMS.to_string(),
            code: ErrorCode::InvalidParams,
        }
    }

    pub fn invalid_api_key() -> Self {
        Self::Unauthorized(messages::INVALID_API_KEY.to_string())
    }

    pub fn internal(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BadRequest { code, .. } => *code,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::NotFound => ErrorCode::NotFound,
            Self::MethodNotAllowed => ErrorCode::MethodNotAllowed,
            Self::UnprocessableEntity(_) => ErrorCode::UnprocessableEntity,
            Self::Internal { .. } => ErrorCode::InternalError,
            Self::Database(_) => ErrorCode::DatabaseError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().code();

        let error = match self {
            AppError::UnprocessableEntity(message) => {
                tracing::info!(error_code = code, %message, "Request failed schema validation");
                return (status, Json(ValidationErrorResponse { message })).into_response();
            }
            AppError::BadRequest { message, .. } => {
                tracing::info!(error_code = code, %message, "Bad request");
                message
            }
            AppError::Unauthorized(message) => {
                tracing::info!(error_code = code, "Unauthorized");
                message
            }
            AppError::NotFound => messages::NOT_FOUND.to_string(),
            AppError::MethodNotAllowed => messages::METHOD_NOT_ALLOWED.to_string(),
            AppError::Internal { message, detail } => {
                tracing::error!(error_code = code, %detail, "{}", message);
                message
            }
            AppError::Database(e) => {
                tracing::error!(error_code = code, error = ?e, "Database error");
                messages::SOMETHING_WENT_WRONG.to_string()
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorized_body_is_exact() {
        let (status, body) = render(AppError::invalid_api_key()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Invalid or Missing API key"}));
    }

    #[tokio::test]
    async fn test_unprocessable_uses_message_key() {
        let (status, body) =
            render(AppError::UnprocessableEntity("Code: too_small ~ Path: event.name".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"message": "Code: too_small ~ Path: event.name"}));
    }

    #[tokio::test]
    async fn test_domain_message_passes_through() {
        let (status, body) = render(AppError::domain("Endpoint not found: acme")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Endpoint not found: acme"}));
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let (status, body) = render(AppError::internal(
            messages::FAILED_TO_CREATE_EVENT,
            "connection refused (os error 111)",
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to create event"}));
    }

    #[tokio::test]
    async fn test_database_error_is_generic() {
        let (status, body) = render(AppError::from(DbErr::Custom("pool closed".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Something went wrong"}));
    }

    #[tokio::test]
    async fn test_method_not_allowed_sets_allow() {
        let response = handlers::post_only().await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[axum::http::header::ALLOW], "POST");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "Method Not Allowed"}));
    }
}
