//! crates/idea_radar_core/src/ports.rs
//!
//! Defines the service contracts (traits) the pipelines depend on.
//! These traits form the boundary of the hexagonal architecture, so the core
//! never talks to the news API, the model endpoint, or the database directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{IdeaRecord, NewsArticle, NewsRecord};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
    #[error("Upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait NewsFetchService: Send + Sync {
    /// Fetches one bounded batch of recent articles for the configured topics.
    async fn fetch_articles(&self) -> PortResult<Vec<NewsArticle>>;
}

#[async_trait]
pub trait IdeaGenerationService: Send + Sync {
    /// Sends a prompt to a generative model and returns its raw text answer.
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}

/// The record store shared by both pipelines.
///
/// The `replace_*` operations must be atomic: stale rows are removed and the new
/// batch is inserted together, or the store is left untouched.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- News ---
    async fn replace_news(
        &self,
        stale_before: DateTime<Utc>,
        batch: Vec<NewsRecord>,
    ) -> PortResult<Vec<NewsRecord>>;

    /// News ordered by trend score, highest first.
    async fn top_news(&self, limit: Option<usize>) -> PortResult<Vec<NewsRecord>>;

    // --- Ideas ---
    async fn replace_ideas(
        &self,
        stale_before: DateTime<Utc>,
        batch: Vec<IdeaRecord>,
    ) -> PortResult<Vec<IdeaRecord>>;

    /// Ideas ordered by generation time, newest first.
    async fn latest_ideas(&self, limit: Option<usize>) -> PortResult<Vec<IdeaRecord>>;
}
