//! Shared JSON error body and router fallback handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::{ToResponse, ToSchema};

/// Standard error messages and machine-readable codes
pub mod messages {
    pub const VALIDATION_FAILED: &str = "Request validation failed";

    pub const CODE_VALIDATION: &str = "VALIDATION_ERROR";
}

/// Error body shared by infrastructure-level responses (validation
/// rejections, the 404 fallback).
///
/// # JSON Example
///
/// ```json
/// {
///   "error": "BadRequest",
///   "message": "Request validation failed",
///   "details": {"email": [{"code": "email"}]}
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details (e.g., per-field validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Stable code for client-side handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "error": "BadRequest",
        "message": "Request validation failed",
        "details": {
            "email": [{
                "code": "email",
                "message": null,
                "params": {"value": "not-an-email"}
            }]
        },
        "code": "VALIDATION_ERROR"
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

/// Fallback handler for unknown routes.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse {
        error: "NotFound".to_string(),
        message: "The requested resource was not found".to_string(),
        details: None,
        code: None,
    });

    (StatusCode::NOT_FOUND, body).into_response()
}
