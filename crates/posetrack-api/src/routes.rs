//! API routes.

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::analysis::{
    analyze_video, delete_analysis, get_analysis, get_video_analyses,
};
use crate::handlers::health::health;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let analysis_routes = Router::new()
        // Run an analysis
        .route("/analyze/video/:video_id", post(analyze_video))
        // Fetch one analysis
        .route("/analysis/:analysis_id", get(get_analysis))
        // All analyses for a video
        .route("/analysis/video/:video_id", get(get_video_analyses))
        // Delete an analysis
        .route("/analysis/:analysis_id/delete", delete(delete_analysis));

    let health_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(analysis_routes)
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
