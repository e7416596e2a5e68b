//! Foodgram API Library
//!
//! Recipe publishing with tagged, quantified ingredients, favorites, a
//! shopping cart with a summed export, and author subscriptions.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod media;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use db::{create_pool, run_migrations, Db};
pub use error::{AppError, Result};
pub use media::MediaStorage;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use routes::{
    add_favorite, add_to_cart, create_recipe, delete_recipe, download_shopping_cart,
    get_ingredient, get_recipe, get_tag, get_user, health_check, list_ingredients, list_recipes,
    list_subscriptions, list_tags, list_users, me, remove_favorite, remove_from_cart, subscribe,
    unsubscribe, update_recipe,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub media: MediaStorage,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Db, config: Config) -> Self {
        let media = MediaStorage::new(&config.media_root, &config.media_url);
        Self { db, config, media }
    }
}

/// Build the API router with CORS, media serving and request tracing
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let media_path = state.config.media_url.trim_matches('/').to_string();
    let media = ServeDir::new(state.media.root());
    let log_requests = state.config.log_requests;

    let mut app: Router<AppState> = Router::new()
        .route("/health", get(health_check))
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:id", get(get_tag))
        .route("/api/ingredients", get(list_ingredients))
        .route("/api/ingredients/:id", get(get_ingredient))
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/:id",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/recipes/:id/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/:id/shopping_cart",
            post(add_to_cart).delete(remove_from_cart),
        )
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(me))
        .route("/api/users/subscriptions", get(list_subscriptions))
        .route("/api/users/:id", get(get_user))
        .route(
            "/api/users/:id/subscribe",
            post(subscribe).delete(unsubscribe),
        );

    // Nesting at the root is not allowed; such a MEDIA_URL leaves serving to a proxy
    if !media_path.is_empty() {
        app = app.nest_service(&format!("/{media_path}"), media);
    }

    let app: Router = app.layer(cors).with_state(state);

    if log_requests {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}
