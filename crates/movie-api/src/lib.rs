//! Movie Selector API - REST server
//!
//! Serves the movie catalog and user accounts over HTTP. Everything except
//! registration, login and the static pages requires a bearer token.

pub mod audit;
pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI document for the whole API
#[derive(OpenApi)]
#[openapi(
    info(title = "Movie Selector API", description = "Movie catalog with user favorites"),
    paths(
        handlers::health::welcome,
        handlers::health::health_check,
        handlers::auth::login_handler,
        handlers::movies::list_movies,
        handlers::movies::get_movie_by_title,
        handlers::movies::get_genre,
        handlers::movies::get_director,
        handlers::users::register_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::add_favorite,
        handlers::users::remove_favorite,
    ),
    components(schemas(
        movie_core::Movie,
        movie_core::Genre,
        movie_core::Director,
        movie_core::UserProfile,
        auth::RegisterRequest,
        auth::UpdateUserRequest,
        auth::LoginRequest,
        auth::LoginResponse,
        auth::MessageResponse,
        error::ApiError,
        error::FieldError,
        handlers::health::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "movies", description = "Movie catalog"),
        (name = "users", description = "Accounts and favorites"),
        (name = "auth", description = "Login"),
        (name = "health", description = "Landing page and liveness"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// CORS policy from the configured allow-list
///
/// Requests without an `Origin` header are not cross-origin and pass through
/// untouched.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.server.public_dir.clone();
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .merge(routes::api_routes(state.clone()))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route_service(
            "/documentation",
            ServeFile::new(public_dir.join("documentation.html")),
        )
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Sample catalog used by the test router
#[cfg(feature = "test-utils")]
pub fn sample_catalog() -> Vec<movie_core::Movie> {
    use movie_core::{Director, Genre, Movie};

    let drama = Genre {
        name: "Drama".to_string(),
        description: "Serious, plot-driven stories.".to_string(),
    };
    let villeneuve = Director {
        name: "Denis Villeneuve".to_string(),
        bio: "French Canadian filmmaker.".to_string(),
        birth_year: Some(1967),
    };

    vec![
        Movie {
            id: "m1".to_string(),
            title: "Lost in Translation".to_string(),
            genre: vec![drama.clone()],
            directors: vec![Director {
                name: "Sofia Coppola".to_string(),
                bio: "American filmmaker.".to_string(),
                birth_year: Some(1971),
            }],
            actors: vec!["Bill Murray".to_string(), "Scarlett Johansson".to_string()],
            description: "Two strangers meet in Tokyo.".to_string(),
            image_path: Some("lostintranslation.png".to_string()),
            featured: Some(true),
        },
        Movie {
            id: "m2".to_string(),
            title: "Arrival".to_string(),
            genre: vec![
                Genre {
                    name: "Science Fiction".to_string(),
                    description: "Speculative stories about science and technology.".to_string(),
                },
                drama,
            ],
            directors: vec![villeneuve.clone()],
            actors: vec!["Amy Adams".to_string()],
            description: "A linguist talks to visitors.".to_string(),
            image_path: None,
            featured: None,
        },
        Movie {
            id: "m3".to_string(),
            title: "Blade Runner 2049".to_string(),
            genre: vec![Genre {
                name: "Science Fiction".to_string(),
                description: "Speculative stories about science and technology.".to_string(),
            }],
            directors: vec![villeneuve],
            actors: vec!["Ryan Gosling".to_string()],
            description: "A blade runner finds a buried secret.".to_string(),
            image_path: None,
            featured: Some(false),
        },
    ]
}

/// State backed by an in-memory store seeded with [`sample_catalog`]
#[cfg(feature = "test-utils")]
pub fn test_state() -> Arc<AppState> {
    let mut config = movie_core::AppConfig::default();
    config.server.public_dir =
        std::path::PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../public"));

    let store = movie_store::MemoryStore::with_movies(sample_catalog());
    let mut state = AppState::new(config, Arc::new(store));
    // Verification reads the cost back from each stored hash
    state.password = auth::password::PasswordConfig {
        memory_cost: 8192,
        time_cost: 1,
        parallelism: 1,
        output_len: Some(32),
    };
    Arc::new(state)
}

/// Create router for testing (uses in-memory store)
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing() -> Router {
    create_router(test_state())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["paths"]["/movies"].is_object());
        assert!(json["paths"]["/users/{username}/movies/{movieId}"].is_object());
        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
    }

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        // Construction must not panic on a bad entry
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
    }
}
