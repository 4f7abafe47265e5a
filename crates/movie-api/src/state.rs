//! Application state management

use crate::auth::jwt::JwtConfig;
use crate::auth::password::PasswordConfig;
use movie_core::AppConfig;
use movie_store::Store;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
///
/// Read-only after startup.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Token signing settings, derived from `config.auth`
    pub jwt: JwtConfig,
    /// Argon2 cost for newly hashed passwords
    pub password: PasswordConfig,
    /// Catalog and credential store
    pub store: Arc<dyn Store>,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state with config and an open store
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let jwt = JwtConfig::from(&config.auth);
        Self {
            config,
            jwt,
            password: PasswordConfig::default(),
            store,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
