//! Movie Selector Core - Domain models and shared configuration
//!
//! This crate defines the types shared by the store and the API server:
//! - Catalog models (movies, genres, directors)
//! - Account models (users and their public profile)
//! - Configuration management

pub mod config;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Catalog
// ============================================================================

/// Genre a movie belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    #[schema(example = "Drama")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Director credited on a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Director {
    #[schema(example = "Sofia Coppola")]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    /// Year of birth, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1971)]
    pub birth_year: Option<i32>,
}

/// Movie record in the catalog
///
/// Movies are loaded into the store out of band. The API only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    /// Opaque movie identifier
    #[serde(rename = "_id")]
    pub id: String,

    #[schema(example = "Lost in Translation")]
    pub title: String,

    /// Genres, in the order they were recorded
    #[serde(default)]
    pub genre: Vec<Genre>,

    #[serde(rename = "Director", default)]
    pub directors: Vec<Director>,

    #[serde(default)]
    pub actors: Vec<String>,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Movie {
    /// Genre entry whose name matches exactly
    pub fn genre_named(&self, name: &str) -> Option<&Genre> {
        self.genre.iter().find(|g| g.name == name)
    }

    /// Director entry whose name matches exactly
    pub fn director_named(&self, name: &str) -> Option<&Director> {
        self.directors.iter().find(|d| d.name == name)
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// User account as held by the credential store
///
/// Carries the password hash, so it is never serialized directly.
/// Use [`User::to_profile`] for anything that leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    /// Movie ids, without duplicates, in insertion order
    pub favorite_movies: Vec<String>,
}

impl User {
    /// Create a new user with a fresh identifier and no favorites
    pub fn new(
        username: String,
        password_hash: String,
        email: String,
        birthday: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            email,
            birthday,
            favorite_movies: Vec::new(),
        }
    }

    /// Add a movie to favorites. Returns `false` if it was already there.
    pub fn add_favorite(&mut self, movie_id: &str) -> bool {
        if self.favorite_movies.iter().any(|m| m == movie_id) {
            return false;
        }
        self.favorite_movies.push(movie_id.to_string());
        true
    }

    /// Remove a movie from favorites. Returns `false` if it was not there.
    pub fn remove_favorite(&mut self, movie_id: &str) -> bool {
        let before = self.favorite_movies.len();
        self.favorite_movies.retain(|m| m != movie_id);
        before != self.favorite_movies.len()
    }

    /// Public representation, safe for responses and token claims
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            birthday: self.birthday,
            favorite_movies: self.favorite_movies.clone(),
        }
    }
}

/// Public user representation (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[schema(example = "moviefan1")]
    pub username: String,
    #[schema(example = "fan@example.com")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "1990-05-17")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub favorite_movies: Vec<String>,
}

/// Partial update of a user record
///
/// `None` leaves a field untouched. The password, if present, is already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password_hash.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
    }

    /// Apply the changes in place
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(birthday) = self.birthday {
            user.birthday = Some(birthday);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        Movie {
            id: "m1".to_string(),
            title: "Heat".to_string(),
            genre: vec![
                Genre {
                    name: "Crime".to_string(),
                    description: "Cops and robbers".to_string(),
                },
                Genre {
                    name: "Thriller".to_string(),
                    description: "Suspense".to_string(),
                },
            ],
            directors: vec![Director {
                name: "Michael Mann".to_string(),
                bio: "American director".to_string(),
                birth_year: Some(1943),
            }],
            actors: vec!["Al Pacino".to_string(), "Robert De Niro".to_string()],
            description: "A heist in Los Angeles".to_string(),
            image_path: None,
            featured: Some(true),
        }
    }

    #[test]
    fn test_movie_lookup_helpers() {
        let movie = sample_movie();
        assert_eq!(movie.genre_named("Thriller").unwrap().description, "Suspense");
        assert!(movie.genre_named("thriller").is_none());
        assert_eq!(movie.director_named("Michael Mann").unwrap().birth_year, Some(1943));
        assert!(movie.director_named("Nobody").is_none());
    }

    #[test]
    fn test_movie_wire_format() {
        let json = serde_json::to_value(sample_movie()).unwrap();
        assert_eq!(json["_id"], "m1");
        assert_eq!(json["Title"], "Heat");
        assert_eq!(json["Genre"][0]["Name"], "Crime");
        assert_eq!(json["Director"][0]["BirthYear"], 1943);
        assert!(json.get("ImagePath").is_none());
    }

    #[test]
    fn test_movie_parses_sparse_document() {
        let movie: Movie = serde_json::from_str(
            r#"{"_id": "m2", "Title": "Alien", "Description": "In space"}"#,
        )
        .unwrap();
        assert!(movie.genre.is_empty());
        assert!(movie.directors.is_empty());
        assert_eq!(movie.featured, None);
    }

    #[test]
    fn test_favorites_have_no_duplicates() {
        let mut user = User::new(
            "moviefan1".to_string(),
            "hash".to_string(),
            "a@b.com".to_string(),
            None,
        );

        assert!(user.add_favorite("m1"));
        assert!(!user.add_favorite("m1"));
        assert_eq!(user.favorite_movies, vec!["m1".to_string()]);

        assert!(!user.remove_favorite("m9"));
        assert_eq!(user.favorite_movies.len(), 1);
        assert!(user.remove_favorite("m1"));
        assert!(user.favorite_movies.is_empty());
    }

    #[test]
    fn test_profile_hides_password_hash() {
        let user = User::new(
            "moviefan1".to_string(),
            "$argon2id$secret".to_string(),
            "a@b.com".to_string(),
            NaiveDate::from_ymd_opt(1990, 5, 17),
        );

        let json = serde_json::to_string(&user.to_profile()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"Username\":\"moviefan1\""));
        assert!(json.contains("\"Birthday\":\"1990-05-17\""));
    }

    #[test]
    fn test_user_changes_apply() {
        let mut user = User::new(
            "moviefan1".to_string(),
            "old".to_string(),
            "a@b.com".to_string(),
            None,
        );
        let changes = UserChanges {
            email: Some("c@d.com".to_string()),
            ..Default::default()
        };

        assert!(!changes.is_empty());
        changes.apply_to(&mut user);
        assert_eq!(user.email, "c@d.com");
        assert_eq!(user.username, "moviefan1");
        assert_eq!(user.password_hash, "old");
        assert!(UserChanges::default().is_empty());
    }
}
