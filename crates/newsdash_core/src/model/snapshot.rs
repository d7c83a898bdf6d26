//! Snapshot document codec and lifecycle helpers.
//!
//! # Responsibility
//! - Parse the merged scrape document into a typed snapshot.
//! - Fabricate the well-formed empty document used when a fetch fails with
//!   no cached data to fall back on.
//! - Encode/decode the two durable records: article list and fetch metadata.
//!
//! # Invariants
//! - Snapshots are never mutated in place; replacement is whole-document.
//! - A malformed document is reported as a typed error, never a panic.
//! - `article_count` is informational; `articles.len()` is authoritative.

use crate::model::article::Article;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Expected rolling window of the scrape pipeline, in hours.
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Codec error for snapshot documents and durable records.
#[derive(Debug)]
pub enum SnapshotError {
    Malformed(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed snapshot document: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// One complete, timestamped article set produced by the scrape pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the pipeline produced this document (ISO-8601, kept raw).
    pub scraped_at: String,
    pub window_hours: u32,
    /// Count claimed by the pipeline. Informational only.
    pub article_count: u32,
    /// Per-source article counts keyed by wire source id. Optional upstream.
    #[serde(default)]
    pub sources: BTreeMap<String, u32>,
    /// Presentation order as merged by the pipeline, not re-sorted here.
    pub articles: Vec<Article>,
    /// Marker carried by fabricated empty documents; absent on real scrapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Snapshot {
    /// Parses the merged scrape document.
    pub fn parse(raw: &str) -> SnapshotResult<Snapshot> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Fabricates a well-formed empty document.
    ///
    /// # Contract
    /// - `article_count` is 0, `articles` empty, all known source counts 0.
    /// - `marker` explains why the document is empty (transport failure).
    pub fn empty(marker: impl Into<String>) -> Snapshot {
        let sources = crate::model::article::Source::ALL
            .iter()
            .map(|source| (source.id().to_string(), 0))
            .collect();
        Snapshot {
            scraped_at: Utc::now().to_rfc3339(),
            window_hours: DEFAULT_WINDOW_HOURS,
            article_count: 0,
            sources,
            articles: Vec::new(),
            error: Some(marker.into()),
        }
    }

    /// Rebuilds a snapshot from the two durable records.
    ///
    /// Source counts are recounted from the article list; the cached
    /// document's own counts are not persisted separately.
    pub fn from_cache(articles: Vec<Article>, meta: FetchMeta) -> Snapshot {
        let mut snapshot = Snapshot {
            scraped_at: meta.scraped_at,
            window_hours: DEFAULT_WINDOW_HOURS,
            article_count: articles.len() as u32,
            sources: BTreeMap::new(),
            articles,
            error: None,
        };
        snapshot.sources = snapshot.recount_sources();
        snapshot
    }

    /// Recounts per-source totals directly from `articles`.
    pub fn recount_sources(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for article in &self.articles {
            *counts.entry(article.source.id().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Durable metadata record for this snapshot.
    pub fn meta(&self) -> FetchMeta {
        FetchMeta {
            scraped_at: self.scraped_at.clone(),
        }
    }

    /// Encodes the durable article-list record.
    pub fn encode_articles(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string(&self.articles)?)
    }
}

/// Decodes the durable article-list record.
pub fn decode_articles(raw: &str) -> SnapshotResult<Vec<Article>> {
    Ok(serde_json::from_str(raw)?)
}

/// Durable metadata stored alongside the cached article list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMeta {
    pub scraped_at: String,
}

impl FetchMeta {
    pub fn encode(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> SnapshotResult<FetchMeta> {
        Ok(serde_json::from_str(raw)?)
    }
}
