//! Username/password authentication against the credential store

use super::password::{verify_password_async, PasswordError};
use movie_core::User;
use movie_store::{StoreError, UserStore};
use thiserror::Error;

/// Why a login was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownUsername,
    BadPassword,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::UnknownUsername => "unknown_username",
            RejectReason::BadPassword => "bad_password",
        }
    }
}

/// Infrastructure failure while checking credentials
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Result of a credential check
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(User),
    Rejected(RejectReason),
    Failed(CredentialError),
}

/// Checks a username/password pair
pub struct LocalAuthenticator<'a, S: UserStore + ?Sized> {
    users: &'a S,
}

impl<'a, S: UserStore + ?Sized> LocalAuthenticator<'a, S> {
    pub fn new(users: &'a S) -> Self {
        Self { users }
    }

    /// Look the user up by exact username, then compare the password hash
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthOutcome {
        let user = match self.users.find_by_username(username).await {
            Ok(Some(user)) => user,
            Ok(None) => return AuthOutcome::Rejected(RejectReason::UnknownUsername),
            Err(e) => return AuthOutcome::Failed(e.into()),
        };

        match verify_password_async(password.to_string(), user.password_hash.clone()).await {
            Ok(true) => AuthOutcome::Authenticated(user),
            Ok(false) => AuthOutcome::Rejected(RejectReason::BadPassword),
            Err(e) => AuthOutcome::Failed(e.into()),
        }
    }
}
