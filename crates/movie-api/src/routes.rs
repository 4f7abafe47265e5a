//! API route definitions

use crate::auth::middleware::auth_middleware;
use crate::handlers::{auth, health, movies, users};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Catalog, account and login routes
///
/// The auth middleware needs the state to verify tokens and re-load users,
/// so the protected group is layered with `from_fn_with_state`.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/users", post(users::register_user))
        .route("/login", post(auth::login_handler));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        // Catalog
        .route("/movies", get(movies::list_movies))
        .route("/movies/:title", get(movies::get_movie_by_title))
        .route("/movies/genre/:genreName", get(movies::get_genre))
        .route("/movies/director/:directorName", get(movies::get_director))
        // Accounts
        .route("/users", get(users::list_users))
        .route(
            "/users/:username",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/:username/movies/:movieId",
            post(users::add_favorite).delete(users::remove_favorite),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
