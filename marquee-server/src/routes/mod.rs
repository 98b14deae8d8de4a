pub mod v1;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::health;
use crate::infra::app_state::AppState;

/// Create the main API router with all versions.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/v1", v1::create_v1_router(state))
}

/// The complete application: versioned API, health probe, tracing and
/// CORS. Shared by `main` and the integration tests.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(create_api_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
