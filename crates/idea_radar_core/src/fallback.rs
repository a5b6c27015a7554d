//! Heuristic idea generator used when the model path fails.
//!
//! Output shape is fixed; confidence, market size and difficulty come from the
//! supplied random source so a seeded source gives reproducible ideas.

use rand::Rng;

use crate::domain::{Difficulty, IdeaDraft, MarketSize};
use crate::synthesis::CategoryGroup;

pub const MAX_FALLBACK_IDEAS: usize = 5;
const BASED_ON_PER_IDEA: usize = 2;
const BASED_ON_TITLE_CHARS: usize = 50;

/// One idea per category group, for at most the first five groups.
pub fn fallback_ideas<R: Rng + ?Sized>(groups: &[CategoryGroup], rng: &mut R) -> Vec<IdeaDraft> {
    groups
        .iter()
        .take(MAX_FALLBACK_IDEAS)
        .map(|group| {
            let leading = group.records.iter().take(BASED_ON_PER_IDEA);
            IdeaDraft {
                idea: format!(
                    "AI-powered solution for {} industry automation and optimization",
                    group.category.as_str().to_lowercase()
                ),
                category: format!("AI + {}", group.category),
                based_on: leading
                    .clone()
                    .map(|r| r.title.chars().take(BASED_ON_TITLE_CHARS).collect())
                    .collect(),
                confidence: rng.random_range(70..90),
                market_size: MarketSize::ALL[rng.random_range(0..MarketSize::ALL.len())],
                difficulty: Difficulty::ALL[rng.random_range(0..Difficulty::ALL.len())],
                news_ids: leading.map(|r| r.id).collect(),
            }
        })
        .collect()
}
