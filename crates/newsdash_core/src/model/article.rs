//! Article record and source enumeration.
//!
//! # Responsibility
//! - Define the immutable article shape as scraped by the external pipeline.
//! - Keep the closed set of newsletter origins in one place.
//!
//! # Invariants
//! - `id` is minted upstream (content-addressed from the source URL) and is
//!   never regenerated client-side.
//! - Equal `id` implies an equal record for this system; snapshots are
//!   replaced whole, so individual articles are never patched.
//! - Timestamps stay raw strings at this boundary; interpretation happens at
//!   view time so a malformed date never invalidates the record.

use serde::{Deserialize, Serialize};

/// Stable identifier for one article, unique within a snapshot and across
/// time for the same source URL.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ArticleId = String;

/// Closed set of newsletter origins the scrape pipeline covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Ben's Bites daily newsletter.
    BensBites,
    /// The AI Rundown newsletter.
    RundownAi,
}

impl Source {
    /// All known sources, in presentation order.
    pub const ALL: [Source; 2] = [Source::BensBites, Source::RundownAi];

    /// Wire identifier used in the snapshot document and durable records.
    pub fn id(self) -> &'static str {
        match self {
            Self::BensBites => "bens_bites",
            Self::RundownAi => "rundown_ai",
        }
    }

    /// Human-readable label for presentation.
    pub fn label(self) -> &'static str {
        match self {
            Self::BensBites => "Ben's Bites",
            Self::RundownAi => "The AI Rundown",
        }
    }

    /// Parses a wire identifier back into the enumeration.
    pub fn parse(value: &str) -> Option<Source> {
        match value {
            "bens_bites" => Some(Self::BensBites),
            "rundown_ai" => Some(Self::RundownAi),
            _ => None,
        }
    }
}

/// One scraped newsletter article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Stable global ID used for bookmarking and deduplication.
    pub id: ArticleId,
    pub source: Source,
    /// Display label as emitted by the scraper; kept verbatim.
    pub source_label: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub url: String,
    /// ISO-8601 string as scraped. May fail to parse; see module invariants.
    pub published_at: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// ISO-8601 capture time recorded by the scraper.
    pub scraped_at: String,
}

impl Article {
    /// Case-insensitive substring match over `title` and `summary`.
    ///
    /// `needle_lower` must already be lowercased by the caller; an absent
    /// summary is treated as the empty string.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        if self.title.to_lowercase().contains(needle_lower) {
            return true;
        }
        self.summary
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::{Article, Source};

    fn article(title: &str, summary: Option<&str>) -> Article {
        Article {
            id: "abcd1234".to_string(),
            source: Source::BensBites,
            source_label: Source::BensBites.label().to_string(),
            title: title.to_string(),
            subtitle: None,
            url: "https://example.com/p/one".to_string(),
            published_at: "2026-02-20T08:00:00+00:00".to_string(),
            summary: summary.map(str::to_string),
            tags: Vec::new(),
            scraped_at: "2026-02-20T09:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn source_ids_roundtrip() {
        for source in Source::ALL {
            assert_eq!(Source::parse(source.id()), Some(source));
        }
        assert_eq!(Source::parse("unknown_feed"), None);
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let article = article("GPT-5 Launch", None);
        assert!(article.matches_search("gpt-5"));
        assert!(article.matches_search("launch"));
        assert!(!article.matches_search("gemini"));
    }

    #[test]
    fn search_matches_summary_and_treats_absent_summary_as_empty() {
        let with_summary = article("Daily digest", Some("Benchmarks for Claude"));
        assert!(with_summary.matches_search("claude"));

        let without_summary = article("Daily digest", None);
        assert!(!without_summary.matches_search("claude"));
        // Empty needle matches everything, summary or not.
        assert!(without_summary.matches_search(""));
    }
}
