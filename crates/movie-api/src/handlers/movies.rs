//! Movie catalog handlers
//!
//! All lookups are exact, case-sensitive matches on the stored names.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use movie_core::{Director, Genre, Movie};
use movie_store::MovieStore;
use std::sync::Arc;

/// List the whole catalog
#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    responses(
        (status = 200, description = "All movies", body = Vec<Movie>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 500, description = "Database error", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.store.list_movies().await?;
    Ok(Json(movies))
}

/// Get a single movie by title
#[utoipa::path(
    get,
    path = "/movies/{title}",
    tag = "movies",
    params(("title" = String, Path, description = "Exact movie title")),
    responses(
        (status = 200, description = "Movie found", body = Movie),
        (status = 404, description = "No movie with that title", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_movie_by_title(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state
        .store
        .find_movie_by_title(&title)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Movie {title}")))?;

    Ok(Json(movie))
}

/// Describe a genre, taken from the first movie that carries it
#[utoipa::path(
    get,
    path = "/movies/genre/{genreName}",
    tag = "movies",
    params(("genreName" = String, Path, description = "Exact genre name")),
    responses(
        (status = 200, description = "Genre found", body = Genre),
        (status = 404, description = "No movie with that genre", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(genre_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let genre = state
        .store
        .find_movie_by_genre(&genre_name)
        .await?
        .and_then(|movie| movie.genre_named(&genre_name).cloned())
        .ok_or_else(|| AppError::NotFound(format!("Genre {genre_name}")))?;

    Ok(Json(genre))
}

/// Describe a director, taken from the first movie that credits them
#[utoipa::path(
    get,
    path = "/movies/director/{directorName}",
    tag = "movies",
    params(("directorName" = String, Path, description = "Exact director name")),
    responses(
        (status = 200, description = "Director found", body = Director),
        (status = 404, description = "No movie by that director", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_director(
    State(state): State<Arc<AppState>>,
    Path(director_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let director = state
        .store
        .find_movie_by_director(&director_name)
        .await?
        .and_then(|movie| movie.director_named(&director_name).cloned())
        .ok_or_else(|| AppError::NotFound(format!("Director {director_name}")))?;

    Ok(Json(director))
}
