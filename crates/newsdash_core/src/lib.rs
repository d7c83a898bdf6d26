//! Feed synchronization and local-persistence engine for Newsdash.
//! This crate is the single source of truth for feed invariants.

pub mod bookmark;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod store;
pub mod sync;
pub mod view;

pub use bookmark::manager::{BookmarkEvent, BookmarkManager};
pub use logging::{default_log_level, init_logging};
pub use model::article::{Article, ArticleId, Source};
pub use model::snapshot::{
    decode_articles, FetchMeta, Snapshot, SnapshotError, SnapshotResult, DEFAULT_WINDOW_HOURS,
};
pub use notify::channel::{NoticeSlot, NOTICE_TTL};
pub use store::state_store::{
    MemoryStateStore, SqliteStateStore, StateStore, KEY_ARTICLES, KEY_BOOKMARKS, KEY_META,
};
pub use sync::engine::{RefreshTicket, RefreshTrigger, SyncEngine, SyncEvent, SyncState};
pub use sync::fetch::{FetchError, FetchResult, FileSnapshotFetcher, SnapshotFetcher};
pub use view::projector::{
    project, ArticleView, Density, NavMode, Projection, SourceFilter, ViewQuery, ViewState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
