use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{BadRequestValidationResponse, ValidatedJson};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{UserEnvelope, UserPayload, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const USERS_TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(UserPayload, UserResponse, UserEnvelope),
        responses(BadRequestValidationResponse)
    ),
    tags(
        (name = USERS_TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .with_state(shared_service)
}

/// Path identifiers arrive as strings; anything that isn't a well-formed
/// ObjectId is a client error, not a driver error.
fn parse_id(id: &str) -> UserResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| UserError::InvalidId(id.to_string()))
}

/// List all users
///
/// GET /users
#[utoipa::path(
    get,
    path = "",
    tag = USERS_TAG,
    responses(
        (status = 200, description = "All user records", body = Vec<UserResponse>),
        (status = 500, description = "Store failure")
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Create a new user
///
/// POST /users
#[utoipa::path(
    post,
    path = "",
    tag = USERS_TAG,
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created successfully", body = UserEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, description = "This user already exists"),
        (status = 500, description = "Store failure")
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<UserPayload>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope::new("User created successfully", user)),
    ))
}

/// Get a user by ID
///
/// GET /users/:id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = USERS_TAG,
    params(
        ("id" = String, Path, description = "User ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed user id"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Store failure")
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(parse_id(&id)?).await?;
    Ok(Json(user))
}

/// Update a user
///
/// PUT/PATCH /users/:id
#[utoipa::path(
    put,
    path = "/{id}",
    tag = USERS_TAG,
    params(
        ("id" = String, Path, description = "User ID (24-char hex)")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated successfully", body = UserEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email owned by another user"),
        (status = 500, description = "Store failure")
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UserPayload>,
) -> UserResult<Json<UserEnvelope>> {
    let user = service.update_user(parse_id(&id)?, input).await?;
    Ok(Json(UserEnvelope::new("User updated successfully", user)))
}

/// Delete a user
///
/// DELETE /users/:id
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USERS_TAG,
    params(
        ("id" = String, Path, description = "User ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = UserEnvelope),
        (status = 400, description = "Malformed user id"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Store failure")
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<UserEnvelope>> {
    let user = service.delete_user(parse_id(&id)?).await?;
    Ok(Json(UserEnvelope::new("User deleted successfully", user)))
}
