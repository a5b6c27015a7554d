//! services/api/src/adapters/news_api.rs
//!
//! Adapter for the NewsAPI.org `everything` endpoint.
//! It implements the `NewsFetchService` port from the `core` crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use idea_radar_core::domain::NewsArticle;
use idea_radar_core::ports::{NewsFetchService, PortError, PortResult};
use serde::Deserialize;
use tracing::{debug, warn};

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiArticle {
    source: Option<ApiSource>,
    title: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct ApiSource {
    name: Option<String>,
}

impl ApiArticle {
    /// `None` when the publish time is missing or unreadable.
    fn into_domain(self) -> Option<NewsArticle> {
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))?;

        Some(NewsArticle {
            title: self.title.unwrap_or_default(),
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            url: self.url.unwrap_or_default(),
            published_at,
            description: self.description.unwrap_or_default(),
        })
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct NewsApiAdapter {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    query: String,
    page_size: u32,
}

impl NewsApiAdapter {
    pub fn new(
        http: reqwest::Client,
        endpoint: String,
        api_key: Option<String>,
        query: String,
        page_size: u32,
    ) -> Self {
        Self {
            http,
            endpoint,
            api_key,
            query,
            page_size,
        }
    }
}

//=========================================================================================
// `NewsFetchService` Trait Implementation
//=========================================================================================

#[async_trait]
impl NewsFetchService for NewsApiAdapter {
    async fn fetch_articles(&self) -> PortResult<Vec<NewsArticle>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PortError::MissingCredentials("NEWS_API_KEY".to_string()))?;

        let page_size = self.page_size.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", self.query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("News request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| PortError::InvalidResponse(format!("News payload: {}", e)))?;

        let received = payload.articles.len();
        let articles: Vec<NewsArticle> = payload
            .articles
            .into_iter()
            .filter_map(ApiArticle::into_domain)
            .collect();

        if articles.len() < received {
            warn!(
                dropped = received - articles.len(),
                "Dropped articles without a readable publish time"
            );
        }
        debug!(articles = articles.len(), "Fetched news batch");

        Ok(articles)
    }
}
