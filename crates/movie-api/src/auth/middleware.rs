//! Authentication middleware for protecting routes
//!
//! Extracts and validates the bearer token from the Authorization header,
//! then re-loads the user named by the token's `_id` claim. On success the
//! live user record is added to request extensions as [`CurrentUser`].

use super::jwt::{validate_token, JwtError};
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use movie_core::User;
use movie_store::{StoreError, UserStore};
use std::sync::Arc;
use thiserror::Error;

/// Authenticated user, re-loaded from the store for this request
///
/// Extract in handlers with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Token user no longer exists")]
    UnknownUser,

    #[error("User lookup failed: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthError::MissingAuthHeader => (
                StatusCode::UNAUTHORIZED,
                ApiError::unauthorized("Missing Authorization header"),
            ),
            AuthError::InvalidAuthHeader => (
                StatusCode::UNAUTHORIZED,
                ApiError::unauthorized("Invalid Authorization header format"),
            ),
            AuthError::InvalidToken(_) | AuthError::UnknownUser => (
                StatusCode::UNAUTHORIZED,
                ApiError::unauthorized("Invalid or expired token"),
            ),
            AuthError::Store(e) => {
                tracing::error!(error = %e, "User lookup failed during authentication");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("DATABASE_ERROR", "Database operation failed"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

/// Authentication middleware that requires a valid bearer token
///
/// # Usage
///
/// ```ignore
/// use axum::{Router, routing::get, middleware};
/// use movie_api::auth::middleware::auth_middleware;
///
/// let protected = Router::new()
///     .route("/movies", get(list_movies))
///     .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ip_address = extract_ip_address(request.headers());
    let user_agent = extract_user_agent(request.headers());

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = match validate_token(&state.jwt, token) {
        Ok(c) => c,
        Err(e) => {
            audit_log(&AuditEvent::InvalidToken {
                ip_address,
                user_agent,
                reason: e.to_string(),
            });
            return Err(AuthError::InvalidToken(e));
        }
    };

    // Signature alone is not enough; the account must still exist
    let user = match state.store.find_by_id(&claims.user.id).await? {
        Some(user) => user,
        None => {
            audit_log(&AuditEvent::InvalidToken {
                ip_address,
                user_agent,
                reason: format!("user {} no longer exists", claims.sub),
            });
            return Err(AuthError::UnknownUser);
        }
    };

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AuthError::MissingAuthHeader.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidAuthHeader.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken(JwtError::ExpiredToken)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UnknownUser.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Store(StoreError::Database("down".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
