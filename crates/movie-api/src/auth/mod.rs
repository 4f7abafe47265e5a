//! Authentication module
//!
//! - Token issuing and validation (HS256 JWT)
//! - Password hashing with Argon2
//! - Username/password checks against the credential store
//! - Middleware for request authentication
//! - Account service for registration, login and profile changes

pub mod jwt;
pub mod local;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use jwt::{issue_token, validate_token, Claims, JwtConfig, JwtError};
pub use local::{AuthOutcome, LocalAuthenticator, RejectReason};
pub use middleware::{auth_middleware, AuthError, CurrentUser};
pub use models::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UpdateUserRequest,
};
pub use password::{hash_password, verify_password};
pub use service::{AccountService, ClientInfo};
