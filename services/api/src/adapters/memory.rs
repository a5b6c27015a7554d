//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. Used when no
//! database is configured, and by the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use idea_radar_core::domain::{IdeaRecord, NewsRecord};
use idea_radar_core::ports::{DatabaseService, PortResult};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    news: Vec<NewsRecord>,
    ideas: Vec<IdeaRecord>,
}

/// Both tables sit behind one lock, so every replace is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseService for MemoryStore {
    async fn replace_news(
        &self,
        stale_before: DateTime<Utc>,
        batch: Vec<NewsRecord>,
    ) -> PortResult<Vec<NewsRecord>> {
        let mut tables = self.tables.write().await;
        tables.news.retain(|n| n.scraped_at >= stale_before);
        tables.news.extend(batch.iter().cloned());
        Ok(batch)
    }

    async fn top_news(&self, limit: Option<usize>) -> PortResult<Vec<NewsRecord>> {
        let mut news = self.tables.read().await.news.clone();
        news.sort_by(|a, b| {
            b.trend_score
                .cmp(&a.trend_score)
                .then(b.scraped_at.cmp(&a.scraped_at))
        });
        if let Some(limit) = limit {
            news.truncate(limit);
        }
        Ok(news)
    }

    async fn replace_ideas(
        &self,
        stale_before: DateTime<Utc>,
        batch: Vec<IdeaRecord>,
    ) -> PortResult<Vec<IdeaRecord>> {
        let mut tables = self.tables.write().await;
        tables.ideas.retain(|i| i.generated_at >= stale_before);
        tables.ideas.extend(batch.iter().cloned());
        Ok(batch)
    }

    async fn latest_ideas(&self, limit: Option<usize>) -> PortResult<Vec<IdeaRecord>> {
        let mut ideas = self.tables.read().await.ideas.clone();
        ideas.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        if let Some(limit) = limit {
            ideas.truncate(limit);
        }
        Ok(ideas)
    }
}
