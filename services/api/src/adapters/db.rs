//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use idea_radar_core::domain::{IdeaRecord, NewsRecord};
use idea_radar_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Advisory lock keys serializing concurrent replaces of one table.
const NEWS_LOCK_KEY: i64 = 0x6e657773;
const IDEAS_LOCK_KEY: i64 = 0x69646561;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Opens a transaction holding the table's advisory lock until commit.
    async fn locked_tx(&self, key: i64) -> PortResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(key)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        Ok(tx)
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn limit_param(limit: Option<usize>) -> Option<i64> {
    limit.map(|l| l as i64)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const NEWS_COLUMNS: &str =
    "id, title, source, url, category, published_at, summary, trend_score, scraped_at";

#[derive(FromRow)]
struct NewsRow {
    id: Uuid,
    title: String,
    source: String,
    url: String,
    category: String,
    published_at: DateTime<Utc>,
    summary: String,
    trend_score: i16,
    scraped_at: DateTime<Utc>,
}
impl NewsRow {
    fn to_domain(self) -> PortResult<NewsRecord> {
        Ok(NewsRecord {
            id: self.id,
            category: self
                .category
                .parse()
                .map_err(|e| PortError::Unexpected(format!("Stored news {}: {}", self.id, e)))?,
            title: self.title,
            source: self.source,
            url: self.url,
            published_at: self.published_at,
            summary: self.summary,
            trend_score: self.trend_score.clamp(0, 100) as u8,
            scraped_at: self.scraped_at,
        })
    }
}

/// Records of one batch share their timestamps; `seq` keeps them in insertion order.
const NEWS_ORDER: &str = "trend_score DESC, scraped_at DESC, seq ASC";
const IDEAS_ORDER: &str = "generated_at DESC, seq ASC";

const IDEA_COLUMNS: &str =
    "id, idea, category, based_on, confidence, market_size, difficulty, news_ids, generated_at";

#[derive(FromRow)]
struct IdeaRow {
    id: Uuid,
    idea: String,
    category: String,
    based_on: Vec<String>,
    confidence: i16,
    market_size: String,
    difficulty: String,
    news_ids: Vec<Uuid>,
    generated_at: DateTime<Utc>,
}
impl IdeaRow {
    fn to_domain(self) -> PortResult<IdeaRecord> {
        let id = self.id;
        let invalid = |e: idea_radar_core::domain::UnknownVariant| {
            PortError::Unexpected(format!("Stored idea {}: {}", id, e))
        };
        Ok(IdeaRecord {
            id,
            market_size: self.market_size.parse().map_err(invalid)?,
            difficulty: self.difficulty.parse().map_err(invalid)?,
            idea: self.idea,
            category: self.category,
            based_on: self.based_on,
            confidence: self.confidence.clamp(0, 100) as u8,
            news_ids: self.news_ids,
            generated_at: self.generated_at,
        })
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn replace_news(
        &self,
        stale_before: DateTime<Utc>,
        batch: Vec<NewsRecord>,
    ) -> PortResult<Vec<NewsRecord>> {
        let mut tx = self.locked_tx(NEWS_LOCK_KEY).await?;

        sqlx::query("DELETE FROM trending_news WHERE scraped_at < $1")
            .bind(stale_before)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let mut inserted = Vec::with_capacity(batch.len());
        for news in batch {
            let row = sqlx::query_as::<_, NewsRow>(&format!(
                "INSERT INTO trending_news ({NEWS_COLUMNS}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {NEWS_COLUMNS}"
            ))
            .bind(news.id)
            .bind(&news.title)
            .bind(&news.source)
            .bind(&news.url)
            .bind(news.category.as_str())
            .bind(news.published_at)
            .bind(&news.summary)
            .bind(i16::from(news.trend_score))
            .bind(news.scraped_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;
            inserted.push(row.to_domain()?);
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(inserted)
    }

    async fn top_news(&self, limit: Option<usize>) -> PortResult<Vec<NewsRecord>> {
        let records = sqlx::query_as::<_, NewsRow>(&format!(
            "SELECT {NEWS_COLUMNS} FROM trending_news ORDER BY {NEWS_ORDER} LIMIT $1"
        ))
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(NewsRow::to_domain).collect()
    }

    async fn replace_ideas(
        &self,
        stale_before: DateTime<Utc>,
        batch: Vec<IdeaRecord>,
    ) -> PortResult<Vec<IdeaRecord>> {
        let mut tx = self.locked_tx(IDEAS_LOCK_KEY).await?;

        sqlx::query("DELETE FROM startup_ideas WHERE generated_at < $1")
            .bind(stale_before)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let mut inserted = Vec::with_capacity(batch.len());
        for idea in batch {
            let row = sqlx::query_as::<_, IdeaRow>(&format!(
                "INSERT INTO startup_ideas ({IDEA_COLUMNS}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {IDEA_COLUMNS}"
            ))
            .bind(idea.id)
            .bind(&idea.idea)
            .bind(&idea.category)
            .bind(&idea.based_on)
            .bind(i16::from(idea.confidence))
            .bind(idea.market_size.as_str())
            .bind(idea.difficulty.as_str())
            .bind(&idea.news_ids)
            .bind(idea.generated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;
            inserted.push(row.to_domain()?);
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(inserted)
    }

    async fn latest_ideas(&self, limit: Option<usize>) -> PortResult<Vec<IdeaRecord>> {
        let records = sqlx::query_as::<_, IdeaRow>(&format!(
            "SELECT {IDEA_COLUMNS} FROM startup_ideas ORDER BY {IDEAS_ORDER} LIMIT $1"
        ))
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(IdeaRow::to_domain).collect()
    }
}
