//! Movie Store - Document store abstraction
//!
//! Provides the catalog and credential stores behind async traits, with a
//! SurrealDB implementation for deployments and an in-memory one for tests
//! and local runs.

use async_trait::async_trait;
use movie_core::{DatabaseConfig, Movie, User, UserChanges};
use std::sync::Arc;
use thiserror::Error;

#[cfg(test)]
mod contract;
pub mod memory;
pub mod seed;
pub mod surrealdb_store;

pub use memory::MemoryStore;
pub use seed::load_catalog;
pub use surrealdb_store::SurrealDbStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Failed to load seed data: {0}")]
    Seed(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read access to the movie catalog
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies
    async fn list_movies(&self) -> Result<Vec<Movie>>;

    /// Movie by identifier
    async fn get_movie(&self, id: &str) -> Result<Option<Movie>>;

    /// First movie whose title matches exactly
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>>;

    /// First movie carrying a genre with this exact name
    async fn find_movie_by_genre(&self, genre: &str) -> Result<Option<Movie>>;

    /// First movie credited to a director with this exact name
    async fn find_movie_by_director(&self, director: &str) -> Result<Option<Movie>>;

    /// Insert or replace a movie. Used by catalog loading, not by the HTTP surface.
    async fn put_movie(&self, movie: Movie) -> Result<()>;
}

/// User accounts and their favorites
///
/// Every mutation is a single-document operation, so concurrent requests for
/// the same user cannot lose each other's favorite updates.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::DuplicateUsername`] if taken.
    async fn create_user(&self, user: User) -> Result<User>;

    async fn list_users(&self) -> Result<Vec<User>>;

    /// Exact, case-sensitive username match
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Apply changes to the user named `username`. `Ok(None)` if absent.
    async fn update_user(&self, username: &str, changes: UserChanges) -> Result<Option<User>>;

    /// Returns whether a user was removed
    async fn delete_user(&self, username: &str) -> Result<bool>;

    /// Add to favorites without duplicating. `Ok(None)` if the user is absent.
    async fn add_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>>;

    /// Remove from favorites, no-op when absent. `Ok(None)` if the user is absent.
    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>>;
}

/// Combined catalog and credential store
pub trait Store: MovieStore + UserStore {}

impl<T: MovieStore + UserStore> Store for T {}

/// Open the store named by the configuration and load the seed catalog, if any
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = if config.is_in_memory() {
        tracing::warn!("Using in-memory store; data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        let store = SurrealDbStore::new(config).await?;
        store.init_schema().await?;
        Arc::new(store)
    };

    if let Some(path) = &config.seed_file {
        load_catalog(store.as_ref(), path).await?;
    }

    Ok(store)
}
