//! Movie Selector Configuration Management
//!
//! Handles configuration from environment variables and TOML files,
//! with defaults suitable for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Signing secret used when `JWT_SECRET` is not provided.
///
/// Only acceptable for local development.
pub const DEFAULT_JWT_SECRET: &str = "development-secret-key-change-in-production";

/// Seven days, the lifetime of an issued token
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Document store connection
    pub database: DatabaseConfig,

    /// Token signing
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Load the file named by `MOVIE_CONFIG` if set, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("MOVIE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_env_override()
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            self.server.host = host;
        }
        // PORT is what most hosting platforms inject
        for key in ["PORT", "API_PORT"] {
            if let Ok(port) = std::env::var(key) {
                self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: port,
                })?;
            }
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            self.server.cors_origins = parse_origins(&origins);
        }
        if let Ok(dir) = std::env::var("PUBLIC_DIR") {
            self.server.public_dir = PathBuf::from(dir);
        }

        // Database
        if let Ok(url) = std::env::var("CONNECTION_URI") {
            self.database.url = url;
        }
        if let Ok(user) = std::env::var("DB_USER") {
            self.database.user = user;
        }
        if let Ok(pass) = std::env::var("DB_PASS") {
            self.database.pass = pass;
        }
        if let Ok(ns) = std::env::var("DB_NAMESPACE") {
            self.database.namespace = ns;
        }
        if let Ok(db) = std::env::var("DB_DATABASE") {
            self.database.database = db;
        }
        if let Ok(path) = std::env::var("MOVIE_SEED") {
            self.database.seed_file = Some(PathBuf::from(path));
        }

        // Auth
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if secret.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "JWT_SECRET".to_string(),
                    value: String::new(),
                });
            }
            self.auth.jwt_secret = secret;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(self)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Origins allowed by CORS. Requests without an Origin header are always allowed.
    pub cors_origins: Vec<String>,

    /// Directory with static assets, including `documentation.html`
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:1234".to_string(),
                "http://localhost:4200".to_string(),
                "https://movie-selector-ads.netlify.app".to_string(),
                "https://x-lamprocapnos-x.github.io".to_string(),
            ],
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Document store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URI (`ws://`, `wss://`, `http://`, `mem://`), or `memory`
    /// for the in-process store
    pub url: String,

    /// Root username
    pub user: String,

    /// Root password
    pub pass: String,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,

    /// JSON array of movies upserted into the catalog at startup
    pub seed_file: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Whether the in-process store was requested
    pub fn is_in_memory(&self) -> bool {
        self.url.eq_ignore_ascii_case("memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8000".to_string(),
            user: "root".to_string(),
            pass: "root".to_string(),
            namespace: "movie_selector".to_string(),
            database: "catalog".to_string(),
            seed_file: None,
        }
    }
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub token_ttl_secs: u64,

    /// Issuer claim
    pub issuer: String,
}

impl AuthConfig {
    /// True while the development secret is still in place
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            issuer: "movie-api".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "movie_api=debug,tower_http=debug".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
