//! Refresh state machine over the snapshot store.
//!
//! # Responsibility
//! - Hydrate the last cached snapshot before any network round trip.
//! - Replace the snapshot whole on a successful fetch and write it through.
//! - Retain prior data and flag degradation on any failed fetch.
//!
//! # Invariants
//! - Concurrent refresh requests are coalesced; at most one is in flight.
//! - A completion whose generation is not the current in-flight one is
//!   dropped, so an out-of-order result can never clobber newer state.
//! - Only manual refreshes emit user-facing events; startup sync is silent.

use crate::model::snapshot::{decode_articles, FetchMeta, Snapshot};
use crate::store::state_store::{StateStore, KEY_ARTICLES, KEY_META};
use crate::sync::fetch::{FetchError, FetchResult, SnapshotFetcher};
use log::{info, warn};

/// Lifecycle of the snapshot store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No data at all: fresh install or unreadable cache.
    Cold,
    /// Showing the cached snapshot, no live fetch has succeeded yet.
    HydratedStale,
    /// A fetch is in flight.
    Loading,
    /// The snapshot came from the most recent successful fetch.
    Live,
    /// The last fetch failed; whatever was held before is still shown.
    Degraded,
}

/// What initiated a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Automatic fetch on startup. Never notifies the user.
    Startup,
    /// Explicit user action. Completion emits one event either way.
    Manual,
}

/// Handle for one issued refresh cycle.
///
/// The generation inside is the engine's guard against out-of-order
/// completion; callers just carry the ticket back to `complete_refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    trigger: RefreshTrigger,
}

/// User-facing outcome of a manual refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Refreshed { article_count: usize },
    RefreshFailed,
}

/// Owner of the snapshot store and its durable records.
pub struct SyncEngine<S: StateStore> {
    store: S,
    snapshot: Option<Snapshot>,
    state: SyncState,
    generation: u64,
    in_flight: Option<u64>,
}

impl<S: StateStore> SyncEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: None,
            state: SyncState::Cold,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Whether the engine is knowingly showing stale data.
    pub fn is_degraded(&self) -> bool {
        self.state == SyncState::Degraded
    }

    pub fn is_loading(&self) -> bool {
        self.state == SyncState::Loading
    }

    /// Adopts the cached snapshot, if any, for optimistic display.
    ///
    /// # Contract
    /// - `Cold -> HydratedStale` when a readable article record exists.
    /// - Absent or corrupt cache leaves the engine `Cold`; hydration is a
    ///   cold-start concern, never an error.
    pub fn hydrate(&mut self) {
        if self.state != SyncState::Cold {
            return;
        }

        let Some(raw_articles) = self.store.read(KEY_ARTICLES) else {
            info!("event=hydrate module=sync status=cold reason=no_cached_articles");
            return;
        };

        let articles = match decode_articles(&raw_articles) {
            Ok(articles) => articles,
            Err(err) => {
                warn!("event=hydrate module=sync status=cold reason=corrupt_cache error={err}");
                return;
            }
        };

        let meta = self
            .store
            .read(KEY_META)
            .and_then(|raw| FetchMeta::decode(&raw).ok())
            .unwrap_or(FetchMeta {
                scraped_at: String::new(),
            });

        let snapshot = Snapshot::from_cache(articles, meta);
        info!(
            "event=hydrate module=sync status=ok article_count={}",
            snapshot.articles.len()
        );
        self.snapshot = Some(snapshot);
        self.state = SyncState::HydratedStale;
    }

    /// Starts one refresh cycle, entering `Loading`.
    ///
    /// Returns `None` when a cycle is already in flight: the redundant
    /// request is dropped silently rather than spawning a second fetch.
    pub fn begin_refresh(&mut self, trigger: RefreshTrigger) -> Option<RefreshTicket> {
        if self.in_flight.is_some() {
            info!("event=refresh module=sync status=coalesced");
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.state = SyncState::Loading;
        Some(RefreshTicket {
            generation: self.generation,
            trigger,
        })
    }

    /// Applies the outcome of one refresh cycle.
    ///
    /// # Contract
    /// - Stale tickets (not the current in-flight generation) are dropped
    ///   without touching any state.
    /// - Success wholly replaces the snapshot and writes both durable
    ///   records through.
    /// - Failure keeps the prior snapshot byte-for-byte; with no prior data
    ///   the fabricated empty document is installed so presentation always
    ///   has a well-formed shape.
    /// - Returns an event only for `RefreshTrigger::Manual`.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        outcome: FetchResult<Snapshot>,
    ) -> Option<SyncEvent> {
        if self.in_flight != Some(ticket.generation) {
            warn!(
                "event=refresh module=sync status=dropped_stale generation={}",
                ticket.generation
            );
            return None;
        }
        self.in_flight = None;

        match outcome {
            Ok(snapshot) => {
                let article_count = snapshot.articles.len();
                self.persist(&snapshot);
                self.snapshot = Some(snapshot);
                self.state = SyncState::Live;
                info!("event=refresh module=sync status=live article_count={article_count}");

                match ticket.trigger {
                    RefreshTrigger::Manual => Some(SyncEvent::Refreshed { article_count }),
                    RefreshTrigger::Startup => None,
                }
            }
            Err(err) => {
                self.state = SyncState::Degraded;
                warn!("event=refresh module=sync status=degraded error={err}");
                if self.snapshot.is_none() {
                    // Cold-start failure still yields a valid empty shape.
                    self.snapshot = Some(Snapshot::empty(failure_marker(&err)));
                }

                match ticket.trigger {
                    RefreshTrigger::Manual => Some(SyncEvent::RefreshFailed),
                    RefreshTrigger::Startup => None,
                }
            }
        }
    }

    /// Runs one full refresh cycle in a single cooperative turn.
    pub fn refresh_with(
        &mut self,
        fetcher: &dyn SnapshotFetcher,
        trigger: RefreshTrigger,
    ) -> Option<SyncEvent> {
        let ticket = self.begin_refresh(trigger)?;
        let outcome = fetcher.fetch();
        self.complete_refresh(ticket, outcome)
    }

    fn persist(&self, snapshot: &Snapshot) {
        match snapshot.encode_articles() {
            Ok(raw) => {
                self.store.write(KEY_ARTICLES, &raw);
            }
            Err(err) => warn!("event=persist module=sync status=dropped record=articles error={err}"),
        }
        match snapshot.meta().encode() {
            Ok(raw) => {
                self.store.write(KEY_META, &raw);
            }
            Err(err) => warn!("event=persist module=sync status=dropped record=meta error={err}"),
        }
    }
}

fn failure_marker(err: &FetchError) -> String {
    match err {
        FetchError::Transport(_) => "fetch_failed".to_string(),
        FetchError::Malformed(_) => "malformed_document".to_string(),
    }
}
