//! Glitchroom API — HTTP surface over the game orchestrator.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod ticker;

use state::AppState;

/// Builds the routes without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/games", routes::games::router())
        .with_state(state)
}

/// Builds the full application with request tracing and CORS.
pub fn app(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
