//! Request and response bodies for accounts and login
//!
//! Field names follow the wire format (`Username`, `Password`, `Email`,
//! `Birthday`). Missing string fields deserialize as empty, and `Birthday`
//! stays text until validated, so that the validation rules, not the JSON
//! extractor, report them.

use chrono::NaiveDate;
use movie_core::UserProfile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Minimum username length
pub const USERNAME_MIN_LEN: u64 = 8;

/// Usernames may only contain ASCII letters and digits
fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("alphanumeric");
        error.message = Some("Username contains non alphanumeric characters - not allowed".into());
        Err(error)
    }
}

/// Birthdays are calendar dates, `YYYY-MM-DD`
fn validate_birthday(value: &str) -> Result<(), ValidationError> {
    match parse_birthday(value) {
        Some(_) => Ok(()),
        None => {
            let mut error = ValidationError::new("date");
            error.message = Some("Birthday must be a date in YYYY-MM-DD format".into());
            Err(error)
        }
    }
}

fn parse_birthday(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// User registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(rename = "Username", default)]
    #[validate(
        length(min = 8, message = "Username must be at least 8 characters long"),
        custom(function = "validate_alphanumeric")
    )]
    #[schema(example = "moviefan1")]
    pub username: String,

    #[serde(rename = "Password", default)]
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Secret123")]
    pub password: String,

    #[serde(rename = "Email", default)]
    #[validate(email(message = "Email does not appear to be valid"))]
    #[schema(example = "fan@example.com")]
    pub email: String,

    #[serde(rename = "Birthday", default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_birthday"))]
    #[schema(format = Date, example = "1990-05-17")]
    pub birthday: Option<String>,
}

impl RegisterRequest {
    /// Parsed birthday; `None` when absent or invalid
    pub fn birthday_date(&self) -> Option<NaiveDate> {
        self.birthday.as_deref().and_then(parse_birthday)
    }
}

/// Partial profile update
///
/// Every field is optional; the registration rules apply to the ones present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(rename = "Username", default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 8, message = "Username must be at least 8 characters long"),
        custom(function = "validate_alphanumeric")
    )]
    pub username: Option<String>,

    #[serde(rename = "Password", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: Option<String>,

    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Email does not appear to be valid"))]
    pub email: Option<String>,

    #[serde(rename = "Birthday", default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_birthday"))]
    #[schema(format = Date)]
    pub birthday: Option<String>,
}

impl UpdateUserRequest {
    pub fn birthday_date(&self) -> Option<NaiveDate> {
        self.birthday.as_deref().and_then(parse_birthday)
    }
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(rename = "Username", default)]
    #[schema(example = "moviefan1")]
    pub username: String,
    #[serde(rename = "Password", default)]
    #[schema(example = "Secret123")]
    pub password: String,
}

/// Successful login: the user's profile and a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Simple confirmation body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "moviefan1 was deleted.")]
    pub message: String,
}
