//! API error handling
//!
//! Every failure a handler can produce ends up as an [`AppError`], which
//! renders a JSON [`ApiError`] body with the matching status code.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use movie_store::StoreError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;

/// Message shown for any rejected login
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect username or password";

/// One failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Request field, as named on the wire
    #[schema(example = "Username")]
    pub field: String,
    /// Human-readable message
    #[schema(example = "Username must be at least 8 characters long")]
    pub message: String,
}

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Field errors, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new("NOT_FOUND", format!("{resource} not found"))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request input failed declarative rules
    Validation(Vec<FieldError>),
    /// Entity absent; carries the resource description
    NotFound(String),
    /// Unique key already taken
    Conflict(String),
    /// Login rejected, for whatever reason
    AuthenticationFailed,
    /// Request body unreadable as JSON
    BadRequest(String),
    Internal(String),
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("VALIDATION_ERROR", "Request validation failed").with_errors(errors),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::not_found(&msg)),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::AuthenticationFailed => (
                StatusCode::BAD_REQUEST,
                ApiError::bad_request(LOGIN_FAILED_MESSAGE),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal_error())
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("DATABASE_ERROR", "Database operation failed"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(name) => {
                AppError::Conflict(format!("{name} already exists"))
            }
            StoreError::Database(msg) => AppError::Database(msg),
            StoreError::Seed(msg) => AppError::Internal(msg),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        AppError::Internal(format!("Failed to issue token: {err}"))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = wire_name(&field);
                errs.iter()
                    .map(move |e| FieldError {
                        field: field.clone(),
                        message: e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{field} is invalid")),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                AppError::Validation(vec![decode_failure(&e.body_text())])
            }
            JsonRejection::JsonSyntaxError(_) => {
                AppError::BadRequest("Request body is not valid JSON".to_string())
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// Field error for a body that parsed as JSON but not as the target type
///
/// The rejection text reads `<prefix>: <path>: <reason>`, or `<prefix>: <reason>`
/// when the failure is not tied to a field.
fn decode_failure(text: &str) -> FieldError {
    let detail = text
        .split_once(": ")
        .map(|(_, rest)| rest)
        .unwrap_or(text);

    match detail.split_once(": ") {
        Some((path, reason)) if is_field_path(path) => FieldError {
            field: path.to_string(),
            message: format!("{path} has an invalid value: {reason}"),
        },
        _ => FieldError {
            field: "body".to_string(),
            message: detail.to_string(),
        },
    }
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

/// `username` -> `Username`
fn wire_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
