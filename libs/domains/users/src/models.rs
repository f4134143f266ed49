use mongodb::bson::{Document, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User entity as persisted in the `users` collection.
///
/// `email` carries a unique index; `password` holds the Argon2 hash, never
/// the plaintext. Any fields beyond the schema are carried verbatim in
/// `profile` and round-trip through the store untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, absent until insertion
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// Argon2 password hash
    pub password: String,
    /// Open set of additional profile fields, passed through unchanged
    #[serde(flatten)]
    pub profile: Document,
}

impl User {
    /// Build the persistable entity from a validated payload and an
    /// already-computed password hash.
    pub fn from_payload(payload: UserPayload, password_hash: String) -> Self {
        Self {
            id: None,
            email: payload.email,
            password: password_hash,
            profile: payload.profile,
        }
    }
}

/// Request body for create and update. Both operations share the same
/// required-field schema: a syntactically valid email and a non-empty
/// password. Everything else is an opaque profile field.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UserPayload {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub profile: Document,
}

/// User as rendered in API responses: the identifier as a hex string and
/// the record otherwise as stored (the password field is the hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    /// The stored password hash (plaintext is never echoed)
    pub password: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub profile: Document,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            password: user.password,
            profile: user.profile,
        }
    }
}

/// Response envelope for the mutating operations
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub status: bool,
    pub message: String,
    pub data: UserResponse,
}

impl UserEnvelope {
    pub fn new(message: &str, data: UserResponse) -> Self {
        Self {
            status: true,
            message: message.to_string(),
            data,
        }
    }
}
