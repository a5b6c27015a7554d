//! crates/idea_radar_core/src/synthesis.rs
//!
//! The idea synthesis pipeline: read the top news, prompt the generative model,
//! validate its answer, fall back to the heuristic generator on any failure,
//! and replace the stored idea generation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Category, Difficulty, IdeaDraft, IdeaRecord, MarketSize, NewsRecord};
use crate::error::PipelineError;
use crate::fallback::fallback_ideas;
use crate::ports::{DatabaseService, IdeaGenerationService, PortError, PortResult};

/// How many of the highest scoring news records feed one synthesis run.
pub const NEWS_FOR_SYNTHESIS: usize = 15;

/// Ideas generated longer ago than this are replaced by the next batch.
pub const IDEA_RETENTION_HOURS: i64 = 24;

//=========================================================================================
// Grouping
//=========================================================================================

/// News records sharing one category, in their original order.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub category: Category,
    pub records: Vec<NewsRecord>,
}

/// Groups records by category. Groups appear in the order their category is
/// first seen, so score-sorted input yields the hottest category first.
pub fn group_by_category(records: &[NewsRecord]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.category == record.category) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(CategoryGroup {
                category: record.category,
                records: vec![record.clone()],
            }),
        }
    }
    groups
}

//=========================================================================================
// Prompt
//=========================================================================================

const PROMPT_PREAMBLE: &str = "You are an expert startup advisor and trend analyst. Based on the following trending tech news, generate 8-10 innovative startup ideas.";

const PROMPT_REQUIREMENTS: &str = r#"REQUIREMENTS:
1. Each idea should be a concise one-liner (max 120 characters)
2. Ideas should combine trends from different categories when possible
3. Focus on practical, implementable solutions
4. Consider market size and difficulty realistically
5. Provide confidence scores based on trend strength and market opportunity

RESPONSE FORMAT (JSON only, no markdown):
{
  "ideas": [
    {
      "idea": "One-liner startup idea description",
      "category": "Primary category or combination (e.g., 'AI + Health')",
      "based_on": ["Trend 1", "Trend 2"],
      "confidence": 85,
      "market_size": "Small|Medium|Large",
      "difficulty": "Low|Medium|High",
      "news_ids": ["id of a news item listed above in square brackets"]
    }
  ]
}

Generate innovative ideas that solve real problems highlighted by these trends. Return only valid JSON."#;

/// Builds the generation prompt listing every record under its category.
pub fn build_prompt(groups: &[CategoryGroup]) -> String {
    let news = groups
        .iter()
        .map(|group| {
            let lines = group
                .records
                .iter()
                .map(|r| format!("- [{}] {}: {}", r.id, r.title, r.summary))
                .collect::<Vec<_>>()
                .join("\n");
            format!("\n{}:\n{}", group.category, lines)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nTRENDING NEWS BY CATEGORY:\n{}\n\n{}",
        PROMPT_PREAMBLE, news, PROMPT_REQUIREMENTS
    )
}

//=========================================================================================
// Response Parsing
//=========================================================================================

/// Removes markdown code fences the model may wrap its JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"```(?:json)?\n?").expect("literal fence pattern"));
    fence.replace_all(raw, "").trim().to_string()
}

#[derive(Deserialize)]
struct IdeasEnvelope {
    ideas: Vec<Value>,
}

#[derive(Deserialize)]
struct RawIdea {
    idea: String,
    category: String,
    #[serde(default)]
    based_on: Option<Value>,
    confidence: f64,
    market_size: MarketSize,
    difficulty: Difficulty,
    #[serde(default)]
    news_ids: Option<Value>,
}

impl RawIdea {
    fn into_draft(self, known_ids: &HashSet<Uuid>) -> IdeaDraft {
        IdeaDraft {
            idea: self.idea,
            category: self.category,
            based_on: string_items(self.based_on),
            confidence: self.confidence.round().clamp(0.0, 100.0) as u8,
            market_size: self.market_size,
            difficulty: self.difficulty,
            news_ids: string_items(self.news_ids)
                .iter()
                .filter_map(|id| Uuid::parse_str(id.trim()).ok())
                .filter(|id| known_ids.contains(id))
                .collect(),
        }
    }
}

/// String elements of a JSON array; anything else (null, scalars, objects) reads as empty.
fn string_items(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Parses the model's raw answer into idea drafts.
///
/// Referenced news ids are narrowed to `known_ids`. Individual ideas that do not
/// fit the schema are skipped; an answer with no usable idea is an error.
pub fn parse_ideas(raw: &str, known_ids: &HashSet<Uuid>) -> PortResult<Vec<IdeaDraft>> {
    let cleaned = strip_code_fences(raw);
    let envelope: IdeasEnvelope = serde_json::from_str(&cleaned)
        .map_err(|e| PortError::InvalidResponse(format!("Unparseable ideas payload: {}", e)))?;

    let total = envelope.ideas.len();
    let drafts: Vec<IdeaDraft> = envelope
        .ideas
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawIdea>(value) {
            Ok(raw) => Some(raw.into_draft(known_ids)),
            Err(e) => {
                warn!("Skipping malformed generated idea: {}", e);
                None
            }
        })
        .collect();

    if drafts.is_empty() {
        return Err(PortError::InvalidResponse(format!(
            "No usable ideas among {} returned",
            total
        )));
    }
    Ok(drafts)
}

//=========================================================================================
// Service
//=========================================================================================

/// Where a batch of ideas came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaOrigin {
    Model,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct SynthesisReport {
    pub ideas: Vec<IdeaRecord>,
    pub based_on_news: usize,
    pub origin: IdeaOrigin,
}

pub struct IdeaSynthesisService {
    db: Arc<dyn DatabaseService>,
    generator: Arc<dyn IdeaGenerationService>,
    rng: Mutex<StdRng>,
}

impl IdeaSynthesisService {
    pub fn new(db: Arc<dyn DatabaseService>, generator: Arc<dyn IdeaGenerationService>) -> Self {
        Self::with_rng(db, generator, StdRng::from_os_rng())
    }

    /// Uses the given random source for the fallback generator.
    pub fn with_rng(
        db: Arc<dyn DatabaseService>,
        generator: Arc<dyn IdeaGenerationService>,
        rng: StdRng,
    ) -> Self {
        Self {
            db,
            generator,
            rng: Mutex::new(rng),
        }
    }

    pub async fn run(&self) -> Result<SynthesisReport, PipelineError> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SynthesisReport, PipelineError> {
        let news = self
            .db
            .top_news(Some(NEWS_FOR_SYNTHESIS))
            .await
            .map_err(PipelineError::from_store)?;

        if news.is_empty() {
            return Err(PipelineError::NoData(
                "No trending news found. Please scrape news first.".to_string(),
            ));
        }

        let groups = group_by_category(&news);
        let known_ids: HashSet<Uuid> = news.iter().map(|n| n.id).collect();

        let (drafts, origin) = match self.generate_from_model(&groups, &known_ids).await {
            Ok(drafts) => (drafts, IdeaOrigin::Model),
            Err(e) => {
                warn!("Idea generation failed, using fallback generator: {}", e);
                (self.generate_fallback(&groups), IdeaOrigin::Fallback)
            }
        };

        let batch: Vec<IdeaRecord> = drafts.into_iter().map(|d| d.into_record(now)).collect();
        let stale_before = now - Duration::hours(IDEA_RETENTION_HOURS);
        let ideas = self
            .db
            .replace_ideas(stale_before, batch)
            .await
            .map_err(PipelineError::from_store)?;

        info!(
            ideas = ideas.len(),
            based_on_news = news.len(),
            origin = ?origin,
            "Idea synthesis complete"
        );

        Ok(SynthesisReport {
            ideas,
            based_on_news: news.len(),
            origin,
        })
    }

    async fn generate_from_model(
        &self,
        groups: &[CategoryGroup],
        known_ids: &HashSet<Uuid>,
    ) -> PortResult<Vec<IdeaDraft>> {
        let prompt = build_prompt(groups);
        let raw = self.generator.generate(&prompt).await?;
        parse_ideas(&raw, known_ids)
    }

    fn generate_fallback(&self, groups: &[CategoryGroup]) -> Vec<IdeaDraft> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        fallback_ideas(groups, &mut *rng)
    }
}
