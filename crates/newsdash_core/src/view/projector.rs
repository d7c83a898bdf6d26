//! Pure projection from feed state to display-ready article lists.
//!
//! # Responsibility
//! - Apply the navigation-mode, source and search predicates over the
//!   snapshot order.
//! - Compute aggregate counts for the presentation chrome.
//!
//! # Invariants
//! - The three retain predicates are independent and commute; any
//!   application order yields the same set in the same relative order.
//! - Filtering is stable: snapshot order is preserved, never re-sorted.
//! - A date that fails to parse is displayed raw, not rejected.

use crate::model::article::{Article, ArticleId, Source};
use crate::model::snapshot::Snapshot;
use chrono::DateTime;
use std::collections::BTreeSet;

/// Top-level view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    /// All current articles.
    #[default]
    Feed,
    /// Bookmarked articles only.
    Saved,
}

/// Active source filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    One(Source),
}

/// Display density. Presentation-only; the projection ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    #[default]
    Grid,
    List,
}

/// The filter inputs of one projection.
#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
    pub mode: NavMode,
    pub source: SourceFilter,
    /// Free-text search; trimmed before matching, empty means no filter.
    pub search: String,
}

/// Ephemeral presentation flags. Derived, never persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState {
    pub density: Density,
    pub loading: bool,
    pub degraded: bool,
}

/// Display-ready article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub id: ArticleId,
    pub source: Source,
    pub source_label: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
    /// Formatted publish time, or the raw string when it does not parse.
    pub published_display: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub saved: bool,
}

/// Projection output: ordered articles plus aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub articles: Vec<ArticleView>,
    /// Total articles in the snapshot, before filtering.
    pub total_count: usize,
    /// Per-source counts in `Source::ALL` order, from snapshot metadata with
    /// a live recount fallback.
    pub source_counts: Vec<(Source, u32)>,
    pub saved_count: usize,
}

/// Projects `(snapshot, bookmark set, query)` into a display-ready view.
pub fn project(
    snapshot: &Snapshot,
    saved: &BTreeSet<ArticleId>,
    query: &ViewQuery,
) -> Projection {
    let needle = query.search.trim().to_lowercase();

    let articles = snapshot
        .articles
        .iter()
        .filter(|article| retain_mode(article, saved, query.mode))
        .filter(|article| retain_source(article, query.source))
        .filter(|article| article.matches_search(&needle))
        .map(|article| to_view(article, saved))
        .collect();

    let recount = snapshot.recount_sources();
    let source_counts = Source::ALL
        .iter()
        .map(|&source| {
            let count = snapshot
                .sources
                .get(source.id())
                .or_else(|| recount.get(source.id()))
                .copied()
                .unwrap_or(0);
            (source, count)
        })
        .collect();

    Projection {
        articles,
        total_count: snapshot.articles.len(),
        source_counts,
        saved_count: saved.len(),
    }
}

fn retain_mode(article: &Article, saved: &BTreeSet<ArticleId>, mode: NavMode) -> bool {
    match mode {
        NavMode::Feed => true,
        NavMode::Saved => saved.contains(&article.id),
    }
}

fn retain_source(article: &Article, filter: SourceFilter) -> bool {
    match filter {
        SourceFilter::All => true,
        SourceFilter::One(source) => article.source == source,
    }
}

fn to_view(article: &Article, saved: &BTreeSet<ArticleId>) -> ArticleView {
    ArticleView {
        id: article.id.clone(),
        source: article.source,
        source_label: article.source_label.clone(),
        title: article.title.clone(),
        subtitle: article.subtitle.clone(),
        url: article.url.clone(),
        published_display: format_published(&article.published_at),
        summary: article.summary.clone(),
        tags: article.tags.clone(),
        saved: saved.contains(&article.id),
    }
}

/// Formats an ISO-8601 publish time for display, falling back to the raw
/// string when parsing fails.
pub fn format_published(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%b %d, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
