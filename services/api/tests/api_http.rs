// tests/api_http.rs
//
// HTTP-level tests for the API router without opening sockets.
// Requests go through tower::ServiceExt::oneshot against an in-memory store
// and stubbed news / model ports.

use std::sync::Arc;

use api_lib::adapters::MemoryStore;
use api_lib::web::{router, state::AppState};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use idea_radar_core::domain::NewsArticle;
use idea_radar_core::ports::{
    DatabaseService, IdeaGenerationService, NewsFetchService, PortError, PortResult,
};
use idea_radar_core::{IdeaSynthesisService, NewsIngestionService};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use tower::ServiceExt as _; // for `oneshot`

const BODY_LIMIT: usize = 1024 * 1024;

//=========================================================================================
// Stubs
//=========================================================================================

enum StubFeed {
    Articles,
    Down,
    NoKey,
}

#[async_trait]
impl NewsFetchService for StubFeed {
    async fn fetch_articles(&self) -> PortResult<Vec<NewsArticle>> {
        let now = Utc::now();
        let article = |title: &str, description: &str, hours: i64| NewsArticle {
            title: title.to_string(),
            source: "TechWire".to_string(),
            url: format!("https://example.com/{}", hours),
            published_at: now - Duration::hours(hours),
            description: description.to_string(),
        };
        match self {
            StubFeed::Articles => Ok(vec![
                article("OpenAI launches agents", "OpenAI announces an LLM product", 1),
                article("Solar startup raises", "Renewable energy funding round", 10),
                article("Missing description", "", 1),
            ]),
            StubFeed::Down => Err(PortError::Upstream {
                status: 429,
                body: "rate limited".to_string(),
            }),
            StubFeed::NoKey => Err(PortError::MissingCredentials("NEWS_API_KEY".to_string())),
        }
    }
}

struct DownModel;

#[async_trait]
impl IdeaGenerationService for DownModel {
    async fn generate(&self, _prompt: &str) -> PortResult<String> {
        Err(PortError::Upstream {
            status: 503,
            body: "overloaded".to_string(),
        })
    }
}

fn test_router(feed: StubFeed) -> Router {
    let db: Arc<dyn DatabaseService> = Arc::new(MemoryStore::new());
    let state = AppState::new(
        db.clone(),
        NewsIngestionService::new(Arc::new(feed), db.clone()),
        IdeaSynthesisService::with_rng(db, Arc::new(DownModel), StdRng::seed_from_u64(5)),
    );
    router(Arc::new(state))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    payload: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request_body = match payload {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let req = builder.body(request_body).expect("build request");

    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

//=========================================================================================
// Tests
//=========================================================================================

#[tokio::test]
async fn health_returns_ok() {
    let app = test_router(StubFeed::Articles);
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn generate_before_scrape_is_404() {
    let app = test_router(StubFeed::Articles);
    let (status, body) = send(&app, "POST", "/generate-ideas", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "No trending news found. Please scrape news first."
    );
}

#[tokio::test]
async fn scrape_then_generate_round_trip() {
    let app = test_router(StubFeed::Articles);

    let (status, scraped) = send(&app, "POST", "/scrape-news", None).await;
    assert_eq!(status, StatusCode::OK, "scrape failed: {}", scraped);
    assert_eq!(scraped["success"], true);
    assert_eq!(scraped["articlesProcessed"], 2);
    assert_eq!(scraped["articles"][0]["title"], "OpenAI launches agents");
    assert_eq!(scraped["articles"][0]["category"], "AI");
    assert_eq!(scraped["articles"][0]["trend_score"], 90);
    assert_eq!(scraped["articles"][1]["category"], "Climate");
    assert_eq!(scraped["articles"][1]["trend_score"], 80);

    let (status, news) = send(&app, "GET", "/news", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(news.as_array().unwrap().len(), 2);

    let (status, generated) = send(&app, "POST", "/generate-ideas", None).await;
    assert_eq!(status, StatusCode::OK, "generate failed: {}", generated);
    assert_eq!(generated["usedFallback"], true);
    assert_eq!(generated["basedOnNews"], 2);
    assert_eq!(generated["ideasGenerated"], 2);
    assert_eq!(generated["ideas"][0]["category"], "AI + AI");
    assert_eq!(generated["ideas"][1]["category"], "AI + Climate");

    let news_ids: Vec<Value> = news
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].clone())
        .collect();
    for idea in generated["ideas"].as_array().unwrap() {
        for id in idea["news_ids"].as_array().unwrap() {
            assert!(news_ids.contains(id));
        }
    }

    let (status, ideas) = send(&app, "GET", "/ideas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ideas.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn scrape_honours_category_filter() {
    let app = test_router(StubFeed::Articles);
    let (status, body) = send(
        &app,
        "POST",
        "/scrape-news",
        Some(json!({ "categories": ["Climate"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["articlesProcessed"], 1);
    assert_eq!(body["articles"][0]["category"], "Climate");
}

#[tokio::test]
async fn scrape_rejects_unknown_categories() {
    let app = test_router(StubFeed::Articles);
    let (status, body) = send(
        &app,
        "POST",
        "/scrape-news",
        Some(json!({ "categories": ["Gaming"] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn scrape_failures_map_to_error_statuses() {
    let (status, body) = send(&test_router(StubFeed::Down), "POST", "/scrape-news", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("429"));

    let (status, _) = send(&test_router(StubFeed::NoKey), "POST", "/scrape-news", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn failed_scrape_keeps_previous_news() {
    let db: Arc<dyn DatabaseService> = Arc::new(MemoryStore::new());
    let build = |feed: StubFeed| {
        router(Arc::new(AppState::new(
            db.clone(),
            NewsIngestionService::new(Arc::new(feed), db.clone()),
            IdeaSynthesisService::new(db.clone(), Arc::new(DownModel)),
        )))
    };

    let (status, _) = send(&build(StubFeed::Articles), "POST", "/scrape-news", None).await;
    assert_eq!(status, StatusCode::OK);

    let failing = build(StubFeed::Down);
    let (status, _) = send(&failing, "POST", "/scrape-news", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (_, news) = send(&failing, "GET", "/news", None).await;
    assert_eq!(news.as_array().unwrap().len(), 2);
}
