//! crates/idea_radar_core/src/domain.rs
//!
//! Defines the core data structures for the news and idea pipelines.
//! These structs know nothing about the database or the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Enumerations
//=========================================================================================

/// Technology domain a news item is classified into.
///
/// The declaration order is also the categorizer's priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AI")]
    Ai,
    Fintech,
    Health,
    Climate,
    Crypto,
    #[serde(rename = "SaaS")]
    Saas,
    Hardware,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Ai,
        Category::Fintech,
        Category::Health,
        Category::Climate,
        Category::Crypto,
        Category::Saas,
        Category::Hardware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::Fintech => "Fintech",
            Category::Health => "Health",
            Category::Climate => "Climate",
            Category::Crypto => "Crypto",
            Category::Saas => "SaaS",
            Category::Hardware => "Hardware",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSize {
    Small,
    Medium,
    Large,
}

impl MarketSize {
    pub const ALL: [MarketSize; 3] = [MarketSize::Small, MarketSize::Medium, MarketSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSize::Small => "Small",
            MarketSize::Medium => "Medium",
            MarketSize::Large => "Large",
        }
    }
}

impl FromStr for MarketSize {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketSize::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Low, Difficulty::Medium, Difficulty::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Low => "Low",
            Difficulty::Medium => "Medium",
            Difficulty::High => "High",
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a stored or generated string is not one of an enum's spellings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown variant: {0}")]
pub struct UnknownVariant(pub String);

//=========================================================================================
// News
//=========================================================================================

/// A raw article as delivered by the news source. Lives only for one ingestion run.
#[derive(Debug, Clone)]
pub struct NewsArticle {
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    /// Empty when the source had no description.
    pub description: String,
}

/// A categorized and scored news item, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsRecord {
    pub id: Uuid,
    pub title: String,
    pub source: String,
    pub url: String,
    pub category: Category,
    pub published_at: DateTime<Utc>,
    pub summary: String,
    /// Always within 0..=100.
    pub trend_score: u8,
    pub scraped_at: DateTime<Utc>,
}

//=========================================================================================
// Ideas
//=========================================================================================

/// A synthesized startup idea, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaRecord {
    pub id: Uuid,
    pub idea: String,
    /// Free text, e.g. "AI + Health".
    pub category: String,
    pub based_on: Vec<String>,
    pub confidence: u8,
    pub market_size: MarketSize,
    pub difficulty: Difficulty,
    pub news_ids: Vec<Uuid>,
    pub generated_at: DateTime<Utc>,
}

/// An idea before it is stamped with an id and generation time.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaDraft {
    pub idea: String,
    pub category: String,
    pub based_on: Vec<String>,
    pub confidence: u8,
    pub market_size: MarketSize,
    pub difficulty: Difficulty,
    pub news_ids: Vec<Uuid>,
}

impl IdeaDraft {
    pub fn into_record(self, generated_at: DateTime<Utc>) -> IdeaRecord {
        IdeaRecord {
            id: Uuid::new_v4(),
            idea: self.idea,
            category: self.category,
            based_on: self.based_on,
            confidence: self.confidence,
            market_size: self.market_size,
            difficulty: self.difficulty,
            news_ids: self.news_ids,
            generated_at,
        }
    }
}
