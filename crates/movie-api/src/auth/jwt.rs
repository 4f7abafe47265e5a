//! JWT token generation and validation
//!
//! Tokens are signed with HMAC-SHA256 using a single process-wide secret.
//! The payload carries the user's public profile plus `sub = username`
//! and an expiry seven days after issue.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use movie_core::{AuthConfig, User, UserProfile};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// JWT Claims structure
///
/// The user's profile fields are flattened into the payload next to the
/// registered claims, so the token reads like the user document itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - username at issue time
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Public user record
    #[serde(flatten)]
    pub user: UserProfile,
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_secs", &self.expiration_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration_secs: config.token_ttl_secs,
            issuer: config.issuer.clone(),
        }
    }
}

fn now_secs() -> Result<u64, JwtError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Generate a signed token for an authenticated user
///
/// # Example
///
/// ```no_run
/// use movie_api::auth::jwt::{issue_token, JwtConfig};
/// use movie_core::User;
///
/// let user = User::new("moviefan1".into(), "hash".into(), "a@b.com".into(), None);
/// let token = issue_token(&JwtConfig::default(), &user).expect("Failed to generate token");
/// ```
pub fn issue_token(config: &JwtConfig, user: &User) -> Result<String, JwtError> {
    let now = now_secs()?;

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user.username.clone(),
        iat: now,
        exp: now + config.expiration_secs,
        user: user.to_profile(),
    };

    encode_claims(config, &claims)
}

/// Sign arbitrary claims with the configured secret
pub fn encode_claims(config: &JwtConfig, claims: &Claims) -> Result<String, JwtError> {
    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a token and extract its claims
///
/// Any failure (bad signature, expiry, malformed input, wrong issuer or
/// algorithm) is an error; callers treat all of them as unauthenticated.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        let mut user = User::new(
            "moviefan1".to_string(),
            "$argon2id$hash".to_string(),
            "fan@example.com".to_string(),
            None,
        );
        user.add_favorite("m1");
        user
    }

    #[test]
    fn test_issue_and_validate_token() {
        let config = JwtConfig::default();
        let user = test_user();

        let token = issue_token(&config, &user).expect("Failed to generate token");
        let claims = validate_token(&config, &token).expect("Failed to validate token");

        assert_eq!(claims.sub, "moviefan1");
        assert_eq!(claims.user.id, user.id);
        assert_eq!(claims.user.email, "fan@example.com");
        assert_eq!(claims.user.favorite_movies, vec!["m1".to_string()]);
        assert_eq!(claims.iss, "movie-api");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_token_does_not_carry_password_hash() {
        let config = JwtConfig::default();
        let token = issue_token(&config, &test_user()).unwrap();

        let claims = validate_token(&config, &token).unwrap();
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_invalid_token() {
        let config = JwtConfig::default();
        let result = validate_token(&config, "invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = JwtConfig {
            secret: "secret1".to_string(),
            ..Default::default()
        };
        let config2 = JwtConfig {
            secret: "secret2".to_string(),
            ..Default::default()
        };

        let token = issue_token(&config1, &test_user()).unwrap();

        let result = validate_token(&config2, &token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token() {
        let config = JwtConfig::default();
        let now = now_secs().unwrap();

        // Correctly signed, expired an hour ago
        let claims = Claims {
            iss: config.issuer.clone(),
            sub: "moviefan1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            user: test_user().to_profile(),
        };
        let token = encode_claims(&config, &claims).unwrap();

        let result = validate_token(&config, &token);
        assert!(matches!(result, Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_wrong_issuer() {
        let config = JwtConfig::default();
        let other = JwtConfig {
            issuer: "someone-else".to_string(),
            ..Default::default()
        };

        let token = issue_token(&other, &test_user()).unwrap();
        assert!(validate_token(&config, &token).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig {
            secret: "super-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }
}
