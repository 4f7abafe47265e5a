//! Catalog loading
//!
//! Movies reach the store out of band. A seed file is a JSON array of movie
//! documents in the wire format; each one is upserted by `_id`.

use crate::{MovieStore, Result, StoreError};
use movie_core::Movie;
use std::path::Path;

/// Upsert every movie in `path`. Returns the number of movies loaded.
pub async fn load_catalog<S: MovieStore + ?Sized>(store: &S, path: &Path) -> Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display())))?;

    let movies: Vec<Movie> = serde_json::from_str(&raw)
        .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display())))?;

    let count = movies.len();
    for movie in movies {
        store.put_movie(movie).await?;
    }

    tracing::info!(path = %path.display(), count, "Catalog loaded");
    Ok(count)
}
