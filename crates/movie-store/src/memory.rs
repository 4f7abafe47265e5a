//! In-process store
//!
//! Keeps movies and users in insertion order behind async locks. Each
//! operation holds the relevant lock for its whole read-modify-write, which
//! gives the same single-document atomicity the SurrealDB store relies on.

use crate::{MovieStore, Result, StoreError, UserStore};
use async_trait::async_trait;
use movie_core::{Movie, User, UserChanges};
use tokio::sync::RwLock;

/// In-memory catalog and credential store
#[derive(Default)]
pub struct MemoryStore {
    movies: RwLock<Vec<Movie>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a catalog
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies: RwLock::new(movies),
            users: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn list_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }

    async fn get_movie(&self, id: &str) -> Result<Option<Movie>> {
        Ok(self.movies.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>> {
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .find(|m| m.title == title)
            .cloned())
    }

    async fn find_movie_by_genre(&self, genre: &str) -> Result<Option<Movie>> {
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .find(|m| m.genre_named(genre).is_some())
            .cloned())
    }

    async fn find_movie_by_director(&self, director: &str) -> Result<Option<Movie>> {
        Ok(self
            .movies
            .read()
            .await
            .iter()
            .find(|m| m.director_named(director).is_some())
            .cloned())
    }

    async fn put_movie(&self, movie: Movie) -> Result<()> {
        let mut movies = self.movies.write().await;
        match movies.iter_mut().find(|m| m.id == movie.id) {
            Some(existing) => *existing = movie,
            None => movies.push(movie),
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn update_user(&self, username: &str, changes: UserChanges) -> Result<Option<User>> {
        let mut users = self.users.write().await;

        let Some(index) = users.iter().position(|u| u.username == username) else {
            return Ok(None);
        };

        if let Some(new_name) = &changes.username {
            if new_name != username && users.iter().any(|u| &u.username == new_name) {
                return Err(StoreError::DuplicateUsername(new_name.clone()));
            }
        }

        let user = &mut users[index];
        changes.apply_to(user);
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.username != username);
        Ok(users.len() != before)
    }

    async fn add_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users
            .iter_mut()
            .find(|u| u.username == username)
            .map(|user| {
                user.add_favorite(movie_id);
                user.clone()
            }))
    }

    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users
            .iter_mut()
            .find(|u| u.username == username)
            .map(|user| {
                user.remove_favorite(movie_id);
                user.clone()
            }))
    }
}
