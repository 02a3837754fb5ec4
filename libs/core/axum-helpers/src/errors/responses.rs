//! Reusable OpenAPI response types for the gateway's error bodies.

use super::{ErrorResponse, ValidationErrorResponse};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Missing or unknown API key",
    content_type = "application/json",
    example = json!({"error": "Invalid or Missing API key"})
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Only the documented method is accepted",
    content_type = "application/json",
    example = json!({"error": "Method Not Allowed"})
)]
pub struct MethodNotAllowedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Invalid path parameters, invalid body or a domain rejection",
    content_type = "application/json",
    example = json!({"error": "Invalid request body"})
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Body failed schema validation",
    content_type = "application/json",
    example = json!({"message": "Code: too_small ~ Path: event.name ~ Message: must be at least 1 character"})
)]
pub struct UnprocessableEntityResponse(pub ValidationErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unexpected failure; details are only logged",
    content_type = "application/json",
    example = json!({"error": "Something went wrong"})
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);
