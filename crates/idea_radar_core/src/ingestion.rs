//! crates/idea_radar_core/src/ingestion.rs
//!
//! The news ingestion pipeline: fetch, categorize, score, keep the top batch,
//! and replace the stored news generation in one atomic store call.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::categorize::categorize;
use crate::domain::{Category, NewsArticle, NewsRecord};
use crate::error::PipelineError;
use crate::ports::{DatabaseService, NewsFetchService};
use crate::scoring::trend_score;

/// Number of highest scoring articles kept per run.
pub const TOP_NEWS: usize = 20;

/// News scraped longer ago than this is replaced by the next batch.
pub const NEWS_RETENTION_HOURS: i64 = 24;

const SUMMARY_CHARS: usize = 200;

/// Cuts a description down to the stored summary length, marking the cut.
pub fn summarize(description: &str) -> String {
    let mut chars = description.chars();
    let head: String = chars.by_ref().take(SUMMARY_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Turns a raw article into a record, or `None` if it lacks a title or description.
pub fn process_article(
    article: NewsArticle,
    scraped_at: DateTime<Utc>,
) -> Option<NewsRecord> {
    if article.title.trim().is_empty() || article.description.trim().is_empty() {
        return None;
    }

    Some(NewsRecord {
        id: Uuid::new_v4(),
        category: categorize(&article.title, &article.description),
        trend_score: trend_score(
            &article.title,
            &article.description,
            article.published_at,
            scraped_at,
        ),
        summary: summarize(&article.description),
        title: article.title,
        source: article.source,
        url: article.url,
        published_at: article.published_at,
        scraped_at,
    })
}

#[derive(Debug, Clone)]
pub struct IngestionReport {
    pub articles: Vec<NewsRecord>,
}

impl IngestionReport {
    pub fn articles_processed(&self) -> usize {
        self.articles.len()
    }
}

pub struct NewsIngestionService {
    news: Arc<dyn NewsFetchService>,
    db: Arc<dyn DatabaseService>,
}

impl NewsIngestionService {
    pub fn new(news: Arc<dyn NewsFetchService>, db: Arc<dyn DatabaseService>) -> Self {
        Self { news, db }
    }

    /// Runs one ingestion. An empty `categories` filter keeps every category.
    pub async fn run(&self, categories: &[Category]) -> Result<IngestionReport, PipelineError> {
        self.run_at(Utc::now(), categories).await
    }

    pub async fn run_at(
        &self,
        now: DateTime<Utc>,
        categories: &[Category],
    ) -> Result<IngestionReport, PipelineError> {
        let articles = self
            .news
            .fetch_articles()
            .await
            .map_err(PipelineError::from_fetch)?;

        if articles.is_empty() {
            return Err(PipelineError::NoData("No articles found".to_string()));
        }
        let fetched = articles.len();

        let mut batch: Vec<NewsRecord> = articles
            .into_iter()
            .filter_map(|a| process_article(a, now))
            .filter(|r| categories.is_empty() || categories.contains(&r.category))
            .collect();

        debug!(fetched, kept = batch.len(), "Articles processed");

        // Nothing usable left: leave the current generation in place.
        if batch.is_empty() {
            return Err(PipelineError::NoData("No articles found".to_string()));
        }

        // Stable, so equal scores keep fetch order.
        batch.sort_by(|a, b| b.trend_score.cmp(&a.trend_score));
        batch.truncate(TOP_NEWS);

        let stale_before = now - Duration::hours(NEWS_RETENTION_HOURS);
        let articles = self
            .db
            .replace_news(stale_before, batch)
            .await
            .map_err(PipelineError::from_store)?;

        info!(
            fetched,
            stored = articles.len(),
            "News ingestion complete"
        );

        Ok(IngestionReport { articles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            source: "Wire".to_string(),
            url: "https://example.com/a".to_string(),
            published_at: Utc::now(),
            description: description.to_string(),
        }
    }

    #[test]
    fn short_descriptions_are_kept_verbatim() {
        assert_eq!(summarize("short"), "short");
        let exact = "x".repeat(200);
        assert_eq!(summarize(&exact), exact);
    }

    #[test]
    fn long_descriptions_are_cut_with_ellipsis() {
        let long = "y".repeat(201);
        let summary = summarize(&long);
        assert_eq!(summary.len(), 203);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn summary_counts_characters_not_bytes() {
        let long = "é".repeat(250);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), 203);
    }

    #[test]
    fn articles_without_title_or_description_are_dropped() {
        let now = Utc::now();
        assert!(process_article(article("", "desc"), now).is_none());
        assert!(process_article(article("title", ""), now).is_none());
        assert!(process_article(article("  ", "desc"), now).is_none());
    }

    #[test]
    fn processed_article_carries_category_score_and_timestamps() {
        let now = Utc::now();
        let record = process_article(article("OpenAI raises funding", "Big round"), now).unwrap();

        assert_eq!(record.category, Category::Ai);
        assert_eq!(record.trend_score, 90);
        assert_eq!(record.scraped_at, now);
        assert_eq!(record.summary, "Big round");
    }
}
