//! Keyword based news categorization.

use crate::domain::Category;

/// Keyword phrases per category, in priority order. The first category with any
/// matching phrase wins, so overlapping phrases resolve to the earlier entry.
pub const CATEGORY_KEYWORDS: [(Category, &[&str]); 7] = [
    (
        Category::Ai,
        &[
            "artificial intelligence",
            "machine learning",
            "neural network",
            "openai",
            "chatgpt",
            "llm",
            "deep learning",
        ],
    ),
    (
        Category::Fintech,
        &[
            "fintech",
            "payment",
            "banking",
            "financial",
            "cryptocurrency",
            "blockchain",
            "digital wallet",
        ],
    ),
    (
        Category::Health,
        &[
            "health tech",
            "medical",
            "healthcare",
            "telemedicine",
            "biotech",
            "pharmaceutical",
            "wellness",
        ],
    ),
    (
        Category::Climate,
        &[
            "climate tech",
            "carbon",
            "renewable energy",
            "sustainability",
            "green tech",
            "solar",
            "wind energy",
        ],
    ),
    (
        Category::Crypto,
        &[
            "bitcoin",
            "ethereum",
            "defi",
            "nft",
            "cryptocurrency",
            "blockchain",
            "web3",
        ],
    ),
    (
        Category::Saas,
        &[
            "saas",
            "software",
            "cloud",
            "enterprise",
            "productivity",
            "collaboration",
            "automation",
        ],
    ),
    (
        Category::Hardware,
        &[
            "hardware",
            "semiconductor",
            "chip",
            "quantum",
            "robotics",
            "iot",
            "device",
        ],
    ),
];

/// Used when no keyword matches.
pub const DEFAULT_CATEGORY: Category = Category::Saas;

/// Assigns exactly one category to an article.
pub fn categorize(title: &str, description: &str) -> Category {
    let text = format!("{} {}", title, description).to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climate_only_text_is_climate() {
        assert_eq!(
            categorize("Solar farm opens", "A new installation in Nevada"),
            Category::Climate
        );
    }

    #[test]
    fn ai_wins_over_fintech() {
        assert_eq!(
            categorize("Machine learning for payment fraud", ""),
            Category::Ai
        );
    }

    #[test]
    fn shared_keyword_resolves_to_earlier_category() {
        // "cryptocurrency" is listed under both Fintech and Crypto.
        assert_eq!(
            categorize("Cryptocurrency prices swing", "Markets react"),
            Category::Fintech
        );
        assert_eq!(categorize("Bitcoin hits new high", ""), Category::Crypto);
    }

    #[test]
    fn matching_is_case_insensitive_and_spans_description() {
        assert_eq!(
            categorize("Quarterly update", "Team ships new TELEMEDICINE app"),
            Category::Health
        );
    }

    #[test]
    fn unmatched_text_defaults_to_saas() {
        assert_eq!(categorize("Local bakery expands", "Bread"), Category::Saas);
        assert_eq!(categorize("", ""), Category::Saas);
    }

    #[test]
    fn hardware_is_reachable() {
        assert_eq!(
            categorize("New semiconductor fab", "Capacity doubles"),
            Category::Hardware
        );
    }

    #[test]
    fn every_output_is_a_known_category() {
        let samples = [
            ("llm", ""),
            ("banking", ""),
            ("biotech", ""),
            ("carbon", ""),
            ("web3", ""),
            ("cloud", ""),
            ("robotics", ""),
            ("nothing here", "at all"),
        ];
        for (t, d) in samples {
            assert!(Category::ALL.contains(&categorize(t, d)));
        }
    }
}
