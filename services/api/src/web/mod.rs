pub mod rest;
pub mod state;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;
use state::AppState;

// Re-export the handlers so the binary can build the router from one place.
pub use rest::{
    generate_ideas_handler, health_handler, list_ideas_handler, list_news_handler,
    scrape_news_handler,
};

/// Builds the API router without any outer layers.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/scrape-news", post(scrape_news_handler))
        .route("/generate-ideas", post(generate_ideas_handler))
        .route("/news", get(list_news_handler))
        .route("/ideas", get(list_ideas_handler))
        .with_state(app_state)
}

/// CORS for the dashboard. `None` allows any origin.
pub fn cors_layer(allow_origin: Option<&str>) -> Result<CorsLayer, ApiError> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    match allow_origin {
        None => Ok(cors.allow_origin(Any)),
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|e| {
                ApiError::Internal(format!("Invalid CORS origin '{}': {}", origin, e))
            })?;
            Ok(cors.allow_origin(origin))
        }
    }
}
