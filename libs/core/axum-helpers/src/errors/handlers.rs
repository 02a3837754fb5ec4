use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use super::AppError;

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    AppError::NotFound.into_response()
}

/// 405 with the `Allow` header set to `allow`.
pub fn method_not_allowed(allow: &'static str) -> Response {
    let mut response = AppError::MethodNotAllowed.into_response();
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(allow));
    response
}

/// `MethodRouter` fallback for POST-only routes.
///
/// Runs before any extractor of the route, so a wrong method never reaches
/// authentication or body parsing.
pub async fn post_only() -> Response {
    method_not_allowed("POST")
}

/// `MethodRouter` fallback for GET-only routes.
pub async fn get_only() -> Response {
    method_not_allowed("GET, HEAD")
}
