//! User account handlers
//!
//! Any authenticated caller may read or modify any account, including
//! accounts other than their own.

use crate::auth::{
    AccountService, ClientInfo, CurrentUser, MessageResponse, RegisterRequest, UpdateUserRequest,
};
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use movie_core::UserProfile;
use movie_store::{MovieStore, UserStore};
use std::sync::Arc;

/// Register a new user account
///
/// Validation errors for every field are reported together.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Username already exists", body = crate::error::ApiError),
        (status = 422, description = "Validation failed", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = AccountService::new(&state)
        .register(request, ClientInfo::from_headers(&headers))
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserProfile>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let users: Vec<UserProfile> = state
        .store
        .list_users()
        .await?
        .iter()
        .map(|u| u.to_profile())
        .collect();

    Ok(Json(users))
}

/// Get a user by username
#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Exact username")),
    responses(
        (status = 200, description = "User found", body = UserProfile),
        (status = 404, description = "User not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username}")))?;

    Ok(Json(user.to_profile()))
}

/// Update any subset of a user's fields
///
/// A supplied password is hashed before it is stored.
#[utoipa::path(
    put,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Exact username")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 400, description = "New username already exists", body = crate::error::ApiError),
        (status = 404, description = "User not found", body = crate::error::ApiError),
        (status = 422, description = "Validation failed", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(username): Path<String>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = AccountService::new(&state)
        .update(&username, request, &actor)
        .await?;

    Ok(Json(profile))
}

/// Delete a user by username
#[utoipa::path(
    delete,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Exact username")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    AccountService::new(&state).delete(&username, &actor).await?;

    Ok(Json(MessageResponse {
        message: format!("{username} was deleted."),
    }))
}

/// Add a movie to a user's favorites; adding it twice keeps one copy
#[utoipa::path(
    post,
    path = "/users/{username}/movies/{movieId}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Exact username"),
        ("movieId" = String, Path, description = "Movie identifier"),
    ),
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 404, description = "Movie or user not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_movie_exists(&state, &movie_id).await?;

    let user = state
        .store
        .add_favorite(&username, &movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username}")))?;

    tracing::debug!(username = %username, movie_id = %movie_id, "Favorite added");
    Ok(Json(user.to_profile()))
}

/// Remove a movie from a user's favorites; a no-op if it is not there
#[utoipa::path(
    delete,
    path = "/users/{username}/movies/{movieId}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Exact username"),
        ("movieId" = String, Path, description = "Movie identifier"),
    ),
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 404, description = "Movie or user not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    ensure_movie_exists(&state, &movie_id).await?;

    let user = state
        .store
        .remove_favorite(&username, &movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username}")))?;

    tracing::debug!(username = %username, movie_id = %movie_id, "Favorite removed");
    Ok(Json(user.to_profile()))
}

async fn ensure_movie_exists(state: &AppState, movie_id: &str) -> Result<(), AppError> {
    match state.store.get_movie(movie_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("Movie {movie_id}"))),
    }
}
