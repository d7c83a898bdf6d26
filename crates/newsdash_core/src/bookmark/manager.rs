//! Bookmark set owner with write-through persistence.
//!
//! # Responsibility
//! - Toggle and query bookmark membership by stable article id.
//! - Persist the full set after every toggle, best-effort.
//!
//! # Invariants
//! - Membership survives snapshot replacement; ids are not validated against
//!   any snapshot here.
//! - Absent or corrupt durable record degrades to an empty set, never an
//!   error.

use crate::model::article::ArticleId;
use crate::store::state_store::{StateStore, KEY_BOOKMARKS};
use log::{info, warn};
use std::collections::BTreeSet;

/// Outcome of one toggle, for user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkEvent {
    Saved,
    Removed,
}

/// Owner of the durable bookmark set.
pub struct BookmarkManager<S: StateStore> {
    store: S,
    saved: BTreeSet<ArticleId>,
}

impl<S: StateStore> BookmarkManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            saved: BTreeSet::new(),
        }
    }

    /// Loads the persisted set once at startup.
    ///
    /// Absent or corrupt data is a cold start: the set stays empty and is
    /// lazily created on the first toggle.
    pub fn hydrate(&mut self) {
        let Some(raw) = self.store.read(KEY_BOOKMARKS) else {
            return;
        };

        match serde_json::from_str::<Vec<ArticleId>>(&raw) {
            Ok(ids) => {
                self.saved = ids.into_iter().collect();
                info!(
                    "event=hydrate module=bookmark status=ok saved_count={}",
                    self.saved.len()
                );
            }
            Err(err) => {
                warn!("event=hydrate module=bookmark status=cold reason=corrupt_record error={err}");
            }
        }
    }

    /// Flips membership for `id` and persists the full set.
    pub fn toggle(&mut self, id: &str) -> BookmarkEvent {
        let event = if self.saved.remove(id) {
            BookmarkEvent::Removed
        } else {
            self.saved.insert(id.to_string());
            BookmarkEvent::Saved
        };
        self.persist();
        event
    }

    /// Pure membership lookup.
    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Borrow of the full set, for projection.
    pub fn ids(&self) -> &BTreeSet<ArticleId> {
        &self.saved
    }

    fn persist(&self) {
        let ids: Vec<&ArticleId> = self.saved.iter().collect();
        match serde_json::to_string(&ids) {
            Ok(raw) => {
                self.store.write(KEY_BOOKMARKS, &raw);
            }
            Err(err) => {
                warn!("event=persist module=bookmark status=dropped error={err}");
            }
        }
    }
}
