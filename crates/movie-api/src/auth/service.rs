//! Account service layer
//!
//! Business logic for registration, login, profile updates and account
//! removal. Handlers stay thin and delegate here; every security-relevant
//! outcome is written to the audit log.

use super::jwt::{issue_token, JwtConfig};
use super::local::{AuthOutcome, LocalAuthenticator};
use super::models::{LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest};
use super::password::{hash_password_async, PasswordConfig};
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::error::AppError;
use crate::state::AppState;
use axum::http::HeaderMap;
use movie_core::{User, UserChanges, UserProfile};
use movie_store::{Store, StoreError, UserStore};
use validator::Validate;

/// Caller details recorded with audit events
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip_address: extract_ip_address(headers),
            user_agent: extract_user_agent(headers),
        }
    }
}

/// Account operations over the credential store
pub struct AccountService<'a> {
    store: &'a dyn Store,
    jwt: &'a JwtConfig,
    password: &'a PasswordConfig,
}

impl<'a> AccountService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            jwt: &state.jwt,
            password: &state.password,
        }
    }

    /// Validate, hash the password and insert a new user
    pub async fn register(
        &self,
        req: RegisterRequest,
        client: ClientInfo,
    ) -> Result<UserProfile, AppError> {
        if let Err(errors) = req.validate() {
            audit_log(&AuditEvent::RegistrationFailure {
                username: req.username.clone(),
                reason: "validation failed".to_string(),
                ip_address: client.ip_address,
                user_agent: client.user_agent,
            });
            return Err(errors.into());
        }

        let birthday = req.birthday_date();
        let password_hash = hash_password_async(req.password, self.password.clone()).await?;
        let user = User::new(req.username, password_hash, req.email, birthday);

        match self.store.create_user(user).await {
            Ok(user) => {
                audit_log(&AuditEvent::RegistrationSuccess {
                    user_id: user.id.clone(),
                    username: user.username.clone(),
                    ip_address: client.ip_address,
                    user_agent: client.user_agent,
                });
                Ok(user.to_profile())
            }
            Err(StoreError::DuplicateUsername(username)) => {
                audit_log(&AuditEvent::RegistrationFailure {
                    username: username.clone(),
                    reason: "username already exists".to_string(),
                    ip_address: client.ip_address,
                    user_agent: client.user_agent,
                });
                Err(StoreError::DuplicateUsername(username).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and issue a token
    ///
    /// Both rejection reasons surface as the same client error; only the
    /// audit log tells them apart.
    pub async fn login(
        &self,
        req: LoginRequest,
        client: ClientInfo,
    ) -> Result<LoginResponse, AppError> {
        let outcome = LocalAuthenticator::new(self.store)
            .authenticate(&req.username, &req.password)
            .await;

        let user = match outcome {
            AuthOutcome::Authenticated(user) => user,
            AuthOutcome::Rejected(reason) => {
                audit_log(&AuditEvent::LoginFailure {
                    username: req.username,
                    reason: reason.as_str().to_string(),
                    ip_address: client.ip_address,
                    user_agent: client.user_agent,
                });
                return Err(AppError::AuthenticationFailed);
            }
            AuthOutcome::Failed(e) => {
                return Err(AppError::Internal(format!("Credential check failed: {e}")));
            }
        };

        let token = issue_token(self.jwt, &user)?;

        audit_log(&AuditEvent::LoginSuccess {
            user_id: user.id.clone(),
            username: user.username.clone(),
            ip_address: client.ip_address,
            user_agent: client.user_agent,
        });

        Ok(LoginResponse {
            user: user.to_profile(),
            token,
        })
    }

    /// Apply a partial update; a supplied password is re-hashed first
    pub async fn update(
        &self,
        username: &str,
        req: UpdateUserRequest,
        actor: &User,
    ) -> Result<UserProfile, AppError> {
        req.validate()?;
        let birthday = req.birthday_date();

        let password_hash = match req.password {
            Some(password) => Some(hash_password_async(password, self.password.clone()).await?),
            None => None,
        };
        let password_changed = password_hash.is_some();

        let changes = UserChanges {
            username: req.username,
            password_hash,
            email: req.email,
            birthday,
        };

        let updated = self
            .store
            .update_user(username, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {username}")))?;

        audit_log(&AuditEvent::AccountUpdated {
            username: updated.username.clone(),
            updated_by: actor.username.clone(),
            password_changed,
        });

        Ok(updated.to_profile())
    }

    /// Remove the account named `username`
    pub async fn delete(&self, username: &str, actor: &User) -> Result<(), AppError> {
        if !self.store.delete_user(username).await? {
            return Err(AppError::NotFound(format!("User {username}")));
        }

        audit_log(&AuditEvent::AccountDeleted {
            username: username.to_string(),
            deleted_by: actor.username.clone(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_token;
    use movie_core::AppConfig;
    use movie_store::MemoryStore;
    use std::sync::Arc;

    fn state() -> AppState {
        let mut state = AppState::new(AppConfig::default(), Arc::new(MemoryStore::new()));
        state.password = PasswordConfig {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        };
        state
    }

    fn registration() -> RegisterRequest {
        RegisterRequest {
            username: "moviefan1".to_string(),
            password: "Secret123".to_string(),
            email: "a@b.com".to_string(),
            birthday: None,
        }
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            username: "moviefan1".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = state();
        let service = AccountService::new(&state);

        let profile = service
            .register(registration(), ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(profile.username, "moviefan1");

        let response = service
            .login(login_request("Secret123"), ClientInfo::default())
            .await
            .unwrap();
        let claims = validate_token(&state.jwt, &response.token).unwrap();
        assert_eq!(claims.sub, "moviefan1");
        assert_eq!(response.user.id, profile.id);
    }

    #[tokio::test]
    async fn test_stored_hash_is_not_plaintext() {
        let state = state();
        AccountService::new(&state)
            .register(registration(), ClientInfo::default())
            .await
            .unwrap();

        let stored = state
            .store
            .find_by_username("moviefan1")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "Secret123");
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let state = state();
        let service = AccountService::new(&state);

        service
            .register(registration(), ClientInfo::default())
            .await
            .unwrap();
        let result = service.register(registration(), ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_invalid_registration_collects_errors() {
        let state = state();
        let req = RegisterRequest {
            username: "a!".to_string(),
            password: String::new(),
            email: "nope".to_string(),
            birthday: None,
        };

        match AccountService::new(&state)
            .register(req, ClientInfo::default())
            .await
        {
            Err(AppError::Validation(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let state = state();
        let service = AccountService::new(&state);
        service
            .register(registration(), ClientInfo::default())
            .await
            .unwrap();

        let bad_password = service
            .login(login_request("wrong"), ClientInfo::default())
            .await;
        let unknown_user = service
            .login(
                LoginRequest {
                    username: "nobodyhere".to_string(),
                    password: "Secret123".to_string(),
                },
                ClientInfo::default(),
            )
            .await;

        assert!(matches!(bad_password, Err(AppError::AuthenticationFailed)));
        assert!(matches!(unknown_user, Err(AppError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let state = state();
        let service = AccountService::new(&state);
        service
            .register(registration(), ClientInfo::default())
            .await
            .unwrap();
        let actor = state
            .store
            .find_by_username("moviefan1")
            .await
            .unwrap()
            .unwrap();

        let req = UpdateUserRequest {
            password: Some("NewSecret456".to_string()),
            ..Default::default()
        };
        service.update("moviefan1", req, &actor).await.unwrap();

        assert!(service
            .login(login_request("Secret123"), ClientInfo::default())
            .await
            .is_err());
        assert!(service
            .login(login_request("NewSecret456"), ClientInfo::default())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let state = state();
        let service = AccountService::new(&state);
        let actor = User::new("someone1".into(), "x".into(), "s@x.com".into(), None);

        let update = service
            .update("ghostuser", UpdateUserRequest::default(), &actor)
            .await;
        assert!(matches!(update, Err(AppError::NotFound(_))));

        let delete = service.delete("ghostuser", &actor).await;
        assert!(matches!(delete, Err(AppError::NotFound(_))));
    }
}
