//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use idea_radar_core::domain::{Category, IdeaRecord, NewsRecord};
use idea_radar_core::{IdeaOrigin, PipelineError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        scrape_news_handler,
        generate_ideas_handler,
        list_news_handler,
        list_ideas_handler,
    ),
    components(
        schemas(
            ScrapeNewsRequest,
            ScrapeNewsResponse,
            GenerateIdeasResponse,
            NewsView,
            IdeaView,
            ErrorBody
        )
    ),
    tags(
        (name = "Idea Radar API", description = "Trending tech news and the startup ideas synthesized from it.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Optional body of a scrape request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScrapeNewsRequest {
    /// Keep only articles in these categories. Empty or absent keeps all.
    #[schema(value_type = Option<Vec<String>>)]
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

/// A stored news item.
#[derive(Serialize, ToSchema)]
pub struct NewsView {
    id: Uuid,
    title: String,
    source: String,
    url: String,
    category: String,
    published_at: DateTime<Utc>,
    summary: String,
    trend_score: u8,
    scraped_at: DateTime<Utc>,
}

impl From<NewsRecord> for NewsView {
    fn from(n: NewsRecord) -> Self {
        Self {
            id: n.id,
            title: n.title,
            source: n.source,
            url: n.url,
            category: n.category.to_string(),
            published_at: n.published_at,
            summary: n.summary,
            trend_score: n.trend_score,
            scraped_at: n.scraped_at,
        }
    }
}

/// A stored startup idea.
#[derive(Serialize, ToSchema)]
pub struct IdeaView {
    id: Uuid,
    idea: String,
    category: String,
    based_on: Vec<String>,
    confidence: u8,
    market_size: String,
    difficulty: String,
    news_ids: Vec<Uuid>,
    generated_at: DateTime<Utc>,
}

impl From<IdeaRecord> for IdeaView {
    fn from(i: IdeaRecord) -> Self {
        Self {
            id: i.id,
            idea: i.idea,
            category: i.category,
            based_on: i.based_on,
            confidence: i.confidence,
            market_size: i.market_size.as_str().to_string(),
            difficulty: i.difficulty.as_str().to_string(),
            news_ids: i.news_ids,
            generated_at: i.generated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeNewsResponse {
    success: bool,
    articles_processed: usize,
    articles: Vec<NewsView>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIdeasResponse {
    success: bool,
    ideas_generated: usize,
    ideas: Vec<IdeaView>,
    based_on_news: usize,
    /// True when the heuristic generator replaced the model.
    used_fallback: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    error: String,
}

type ApiFailure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Maps a pipeline error onto its HTTP status.
pub fn pipeline_failure(err: PipelineError) -> ApiFailure {
    let status = match &err {
        PipelineError::NoData(_) => StatusCode::NOT_FOUND,
        PipelineError::ExternalFetch(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Configuration(_) | PipelineError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error!("Pipeline failed ({}): {}", status, err);
    failure(status, err.to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Fetch, categorize and score the latest tech news, replacing the stale batch.
#[utoipa::path(
    post,
    path = "/scrape-news",
    request_body(content = ScrapeNewsRequest, content_type = "application/json", description = "Optional category filter."),
    responses(
        (status = 200, description = "News ingested", body = ScrapeNewsResponse),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 404, description = "No usable articles were found", body = ErrorBody),
        (status = 500, description = "Configuration or store failure", body = ErrorBody),
        (status = 502, description = "The news source failed", body = ErrorBody)
    )
)]
pub async fn scrape_news_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ScrapeNewsResponse>, ApiFailure> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ScrapeNewsRequest::default()
    } else {
        serde_json::from_slice::<ScrapeNewsRequest>(&body).map_err(|e| {
            failure(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", e),
            )
        })?
    };
    let categories = request.categories.unwrap_or_default();

    info!(filter = ?categories, "Scraping news");
    let report = app_state
        .ingestion
        .run(&categories)
        .await
        .map_err(pipeline_failure)?;

    Ok(Json(ScrapeNewsResponse {
        success: true,
        articles_processed: report.articles_processed(),
        articles: report.articles.into_iter().map(NewsView::from).collect(),
    }))
}

/// Synthesize startup ideas from the current top news.
#[utoipa::path(
    post,
    path = "/generate-ideas",
    responses(
        (status = 200, description = "Ideas generated", body = GenerateIdeasResponse),
        (status = 404, description = "No news has been scraped yet", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn generate_ideas_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<GenerateIdeasResponse>, ApiFailure> {
    let report = app_state.synthesis.run().await.map_err(pipeline_failure)?;

    Ok(Json(GenerateIdeasResponse {
        success: true,
        ideas_generated: report.ideas.len(),
        ideas: report.ideas.into_iter().map(IdeaView::from).collect(),
        based_on_news: report.based_on_news,
        used_fallback: report.origin == IdeaOrigin::Fallback,
    }))
}

/// List all stored news, highest trend score first.
#[utoipa::path(
    get,
    path = "/news",
    responses(
        (status = 200, description = "Stored news", body = Vec<NewsView>),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_news_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<NewsView>>, ApiFailure> {
    let news = app_state.db.top_news(None).await.map_err(|e| {
        error!("Failed to list news: {:?}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch news")
    })?;
    Ok(Json(news.into_iter().map(NewsView::from).collect()))
}

/// List all stored ideas, newest first.
#[utoipa::path(
    get,
    path = "/ideas",
    responses(
        (status = 200, description = "Stored ideas", body = Vec<IdeaView>),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_ideas_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<IdeaView>>, ApiFailure> {
    let ideas = app_state.db.latest_ideas(None).await.map_err(|e| {
        error!("Failed to list ideas: {:?}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch ideas")
    })?;
    Ok(Json(ideas.into_iter().map(IdeaView::from).collect()))
}

pub async fn health_handler() -> &'static str {
    "OK"
}
