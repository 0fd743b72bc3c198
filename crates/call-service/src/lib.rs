//! Call Service
//!
//! HTTP surface of the J-Navi topping call pipeline. Screens use it to load
//! catalogs, seed and persist a shop's registered calls, build the spoken call
//! phrase, tag menu photos and walk through the dining simulation.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/catalog?store_id&timing` - Normalised topping catalog
//! - `GET /api/stores/{store_id}/selections` - Registration form seed
//! - `PUT /api/stores/{store_id}/calls` - Persist a registration selection
//! - `POST /api/stores/{store_id}/images/tags` - Tag a menu photo with calls
//! - `POST /api/submission` - Format a registration selection
//! - `POST /api/call-text` - Build the call phrase for one timing
//! - `POST /api/simulation` - Advance the dining simulation

pub mod backend_client;
pub mod config;
pub mod handlers;
pub mod models;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use backend_client::{BackendClient, ImageTagPayload, StoreBackend};
pub use config::Config;
pub use handlers::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/catalog", get(handlers::catalog_handler))
        .route(
            "/api/stores/{store_id}/selections",
            get(handlers::store_selections_handler),
        )
        .route(
            "/api/stores/{store_id}/calls",
            put(handlers::update_calls_handler),
        )
        .route(
            "/api/stores/{store_id}/images/tags",
            post(handlers::image_tags_handler),
        )
        .route("/api/submission", post(handlers::submission_handler))
        .route("/api/call-text", post(handlers::call_text_handler))
        .route("/api/simulation", post(handlers::simulation_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
