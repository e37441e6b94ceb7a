use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Read-only catalogue routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalogue
        .route("/games", get(handlers::list_games))
        .route("/games/:id", get(handlers::get_game))
        .route("/lookup", get(handlers::lookup_game))
        .route("/filters", get(handlers::filter_options))
        // Recommendations
        .route("/games/:id/recommendations", get(handlers::get_recommendations))
}
