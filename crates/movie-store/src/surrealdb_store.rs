//! SurrealDB implementation of the catalog and credential stores
//!
//! Movies are stored as-is in the `movie` table, keyed by their `_id`.
//! Users are stored in the `user` table keyed by their id, with a unique
//! index on `username`. Record ids are mirrored in a plain string field so
//! results deserialize without touching SurrealDB's record id type.

use crate::{MovieStore, Result, StoreError, UserStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use movie_core::{DatabaseConfig, Movie, User, UserChanges};
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

/// SurrealDB document store
pub struct SurrealDbStore {
    client: Surreal<Any>,
}

fn db_error(context: &'static str) -> impl Fn(surrealdb::Error) -> StoreError {
    move |e| StoreError::Database(format!("{context}: {e}"))
}

/// Unique index violations surface as query errors mentioning the index
fn is_unique_violation(err: &surrealdb::Error) -> bool {
    err.to_string().contains("already contains")
}

impl SurrealDbStore {
    /// Connect using any engine the URI names (`ws://`, `http://`, `mem://`)
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let client = any::connect(config.url.as_str())
            .await
            .map_err(db_error("SurrealDB connection failed"))?;

        // Embedded engines have no root user
        if !config.url.starts_with("mem://") {
            client
                .signin(Root {
                    username: &config.user,
                    password: &config.pass,
                })
                .await
                .map_err(db_error("SurrealDB auth failed"))?;
        }

        client
            .use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(db_error("SurrealDB namespace error"))?;

        tracing::info!(url = %config.url, "Connected to SurrealDB");
        Ok(Self { client })
    }

    /// Define tables and indexes (idempotent)
    pub async fn init_schema(&self) -> Result<()> {
        self.client
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS movie SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_movie_title ON movie FIELDS Title;
                DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_user_username ON user FIELDS username UNIQUE;
                DEFINE INDEX IF NOT EXISTS idx_user_uid ON user FIELDS uid UNIQUE;
            "#,
            )
            .await
            .map_err(db_error("Schema init failed"))?
            .check()
            .map_err(db_error("Schema init failed"))?;

        Ok(())
    }

    async fn query_movies(&self, query: &str, name: &str, value: &str) -> Result<Vec<Movie>> {
        let mut result = self
            .client
            .query(query)
            .bind((name.to_string(), value.to_string()))
            .await
            .map_err(db_error("Movie query failed"))?;

        result.take(0).map_err(db_error("Movie decode failed"))
    }

    async fn query_users(&self, query: &str, name: &str, value: &str) -> Result<Vec<UserRecord>> {
        let mut result = self
            .client
            .query(query)
            .bind((name.to_string(), value.to_string()))
            .await
            .map_err(db_error("User query failed"))?;

        result.take(0).map_err(db_error("User decode failed"))
    }
}

/// User document as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    uid: String,
    username: String,
    password_hash: String,
    email: String,
    #[serde(default)]
    birthday: Option<NaiveDate>,
    #[serde(default)]
    favorite_movies: Vec<String>,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            uid: user.id,
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            birthday: user.birthday,
            favorite_movies: user.favorite_movies,
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.uid,
            username: record.username,
            password_hash: record.password_hash,
            email: record.email,
            birthday: record.birthday,
            favorite_movies: record.favorite_movies,
        }
    }
}

#[async_trait]
impl MovieStore for SurrealDbStore {
    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let mut result = self
            .client
            .query("SELECT * FROM movie")
            .await
            .map_err(db_error("Movie query failed"))?;

        result.take(0).map_err(db_error("Movie decode failed"))
    }

    async fn get_movie(&self, id: &str) -> Result<Option<Movie>> {
        let movies = self
            .query_movies("SELECT * FROM movie WHERE _id = $id LIMIT 1", "id", id)
            .await?;
        Ok(movies.into_iter().next())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>> {
        let movies = self
            .query_movies(
                "SELECT * FROM movie WHERE Title = $title LIMIT 1",
                "title",
                title,
            )
            .await?;
        Ok(movies.into_iter().next())
    }

    async fn find_movie_by_genre(&self, genre: &str) -> Result<Option<Movie>> {
        let movies = self
            .query_movies(
                "SELECT * FROM movie WHERE Genre.Name CONTAINS $genre LIMIT 1",
                "genre",
                genre,
            )
            .await?;
        Ok(movies.into_iter().next())
    }

    async fn find_movie_by_director(&self, director: &str) -> Result<Option<Movie>> {
        let movies = self
            .query_movies(
                "SELECT * FROM movie WHERE Director.Name CONTAINS $director LIMIT 1",
                "director",
                director,
            )
            .await?;
        Ok(movies.into_iter().next())
    }

    async fn put_movie(&self, movie: Movie) -> Result<()> {
        let key = movie.id.clone();
        self.client
            .query("UPSERT type::thing('movie', $key) CONTENT $movie")
            .bind(("key", key))
            .bind(("movie", movie))
            .await
            .map_err(db_error("Movie upsert failed"))?
            .check()
            .map_err(db_error("Movie upsert failed"))?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for SurrealDbStore {
    async fn create_user(&self, user: User) -> Result<User> {
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(StoreError::DuplicateUsername(user.username));
        }

        let username = user.username.clone();
        let record = UserRecord::from(user);

        let mut result = self
            .client
            .query("CREATE type::thing('user', $uid) CONTENT $record")
            .bind(("uid", record.uid.clone()))
            .bind(("record", record))
            .await
            .map_err(db_error("User create failed"))?;

        let created: Vec<UserRecord> = result.take(0).map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateUsername(username)
            } else {
                StoreError::Database(format!("User create failed: {e}"))
            }
        })?;

        created
            .into_iter()
            .next()
            .map(User::from)
            .ok_or_else(|| StoreError::Database("Failed to create user".to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut result = self
            .client
            .query("SELECT * FROM user")
            .await
            .map_err(db_error("User query failed"))?;

        let records: Vec<UserRecord> = result.take(0).map_err(db_error("User decode failed"))?;
        Ok(records.into_iter().map(User::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let records = self
            .query_users(
                "SELECT * FROM user WHERE username = $username LIMIT 1",
                "username",
                username,
            )
            .await?;
        Ok(records.into_iter().next().map(User::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let records = self
            .query_users("SELECT * FROM user WHERE uid = $uid LIMIT 1", "uid", id)
            .await?;
        Ok(records.into_iter().next().map(User::from))
    }

    async fn update_user(&self, username: &str, changes: UserChanges) -> Result<Option<User>> {
        let current = self.find_by_username(username).await?;
        if current.is_none() || changes.is_empty() {
            return Ok(current);
        }

        if let Some(new_name) = &changes.username {
            if new_name != username && self.find_by_username(new_name).await?.is_some() {
                return Err(StoreError::DuplicateUsername(new_name.clone()));
            }
        }

        // Build dynamic update query
        let mut updates = Vec::new();
        if changes.username.is_some() {
            updates.push("username = $new_username");
        }
        if changes.password_hash.is_some() {
            updates.push("password_hash = $password_hash");
        }
        if changes.email.is_some() {
            updates.push("email = $email");
        }
        if changes.birthday.is_some() {
            updates.push("birthday = $birthday");
        }

        let query = format!(
            "UPDATE user SET {} WHERE username = $username RETURN AFTER",
            updates.join(", ")
        );

        let mut query_builder = self
            .client
            .query(query)
            .bind(("username", username.to_string()));

        if let Some(n) = changes.username.clone() {
            query_builder = query_builder.bind(("new_username", n));
        }
        if let Some(h) = changes.password_hash.clone() {
            query_builder = query_builder.bind(("password_hash", h));
        }
        if let Some(e) = changes.email.clone() {
            query_builder = query_builder.bind(("email", e));
        }
        if let Some(b) = changes.birthday {
            query_builder = query_builder.bind(("birthday", b));
        }

        let mut result = query_builder
            .await
            .map_err(db_error("User update failed"))?;

        let records: Vec<UserRecord> = result.take(0).map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateUsername(changes.username.clone().unwrap_or_default())
            } else {
                StoreError::Database(format!("User update failed: {e}"))
            }
        })?;

        Ok(records.into_iter().next().map(User::from))
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        let records = self
            .query_users(
                "DELETE user WHERE username = $username RETURN BEFORE",
                "username",
                username,
            )
            .await?;
        Ok(!records.is_empty())
    }

    async fn add_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        let mut result = self
            .client
            .query(
                "UPDATE user SET favorite_movies = array::union(favorite_movies ?? [], [$movie_id]) \
                 WHERE username = $username RETURN AFTER",
            )
            .bind(("username", username.to_string()))
            .bind(("movie_id", movie_id.to_string()))
            .await
            .map_err(db_error("Favorite update failed"))?;

        let records: Vec<UserRecord> = result.take(0).map_err(db_error("User decode failed"))?;
        Ok(records.into_iter().next().map(User::from))
    }

    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        let mut result = self
            .client
            .query(
                "UPDATE user SET favorite_movies -= $movie_id \
                 WHERE username = $username RETURN AFTER",
            )
            .bind(("username", username.to_string()))
            .bind(("movie_id", movie_id.to_string()))
            .await
            .map_err(db_error("Favorite update failed"))?;

        let records: Vec<UserRecord> = result.take(0).map_err(db_error("User decode failed"))?;
        Ok(records.into_iter().next().map(User::from))
    }
}
