//! Login handler

use crate::auth::{AccountService, ClientInfo, LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::state::AppState;
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;

/// Log in with username and password
///
/// Returns the user's profile and a bearer token valid for seven days.
/// Unknown usernames and wrong passwords get the same 400 response.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Incorrect username or password", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = AccountService::new(&state)
        .login(request, ClientInfo::from_headers(&headers))
        .await?;

    Ok(Json(response))
}
