use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Probes
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        // Inference
        .route("/predict", post(handlers::predict))
        // Model metadata
        .route("/model/info", get(handlers::model_info))
        // Metrics exposition
        .route("/metrics", get(handlers::metrics))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
