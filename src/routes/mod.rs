use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware, require_user};
use crate::state::AppState;

pub mod lists;
pub mod movies;
pub mod ratings;
pub mod recommendations;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1; everything here requires a forwarded user id
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/movies/search", get(movies::search))
        .route("/movies/:tmdb_id", get(movies::details))
        .route("/ratings", post(ratings::upsert).get(ratings::list))
        .route("/lists", get(lists::list).post(lists::add))
        .route("/lists/:list_type/:tmdb_id", delete(lists::remove))
        .route("/recommendations", post(recommendations::generate))
        .layer(middleware::from_fn(require_user))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
