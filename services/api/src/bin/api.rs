//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, GeminiIdeasAdapter, MemoryStore, NewsApiAdapter},
    config::Config,
    error::ApiError,
    web::{cors_layer, rest::ApiDoc, router, state::AppState},
};
use axum::Router;
use idea_radar_core::ports::DatabaseService;
use idea_radar_core::{IdeaSynthesisService, NewsIngestionService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to the Store ---
    let db: Arc<dyn DatabaseService> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        None => {
            warn!("DATABASE_URL is not set; records will be kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // --- 3. Initialize Service Adapters ---
    let http = reqwest::Client::builder()
        .user_agent(concat!("idea-radar/", env!("CARGO_PKG_VERSION")))
        .timeout(config.http_timeout)
        .build()?;

    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY is not set; news scraping will fail");
    }
    let news_adapter = Arc::new(NewsApiAdapter::new(
        http.clone(),
        config.news_api_url.clone(),
        config.news_api_key.clone(),
        config.news_query.clone(),
        config.news_page_size,
    ));

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; ideas will come from the fallback generator");
    }
    let ideas_adapter = Arc::new(GeminiIdeasAdapter::new(
        http,
        config.gemini_api_base.clone(),
        config.gemini_model.clone(),
        config.gemini_api_key.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        db.clone(),
        NewsIngestionService::new(news_adapter, db.clone()),
        IdeaSynthesisService::new(db, ideas_adapter),
    ));

    // --- 5. Create the Web Router ---
    let api_router = router(app_state).layer(cors_layer(config.cors_allow_origin.as_deref())?);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
