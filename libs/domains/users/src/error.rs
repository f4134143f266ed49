use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for user operations, one variant per failure kind so each
/// maps to its own status code instead of collapsing into a generic 400.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound(ObjectId),

    #[error("This user already exists")]
    DuplicateEmail(String),

    #[error("Invalid user id: {0}")]
    InvalidId(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            UserError::NotFound(_) => (StatusCode::NOT_FOUND, "User not found".to_string()),
            UserError::DuplicateEmail(_) => {
                (StatusCode::CONFLICT, "This user already exists".to_string())
            }
            UserError::InvalidId(id) => {
                (StatusCode::BAD_REQUEST, format!("Invalid user id: {}", id))
            }
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            UserError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "status": false,
                "message": message
            })),
        )
            .into_response()
    }
}
