use newsdash_core::{
    Article, FetchError, FetchResult, MemoryStateStore, RefreshTrigger, Snapshot, SnapshotFetcher,
    Source, StateStore, SyncEngine, SyncEvent, SyncState, KEY_ARTICLES, KEY_META,
};
use std::collections::BTreeMap;

fn article(id: &str, source: Source, title: &str) -> Article {
    Article {
        id: id.to_string(),
        source,
        source_label: source.label().to_string(),
        title: title.to_string(),
        subtitle: None,
        url: format!("https://example.com/p/{id}"),
        published_at: "2026-02-20T08:00:00+00:00".to_string(),
        summary: None,
        tags: Vec::new(),
        scraped_at: "2026-02-20T09:00:00+00:00".to_string(),
    }
}

fn snapshot(scraped_at: &str, articles: Vec<Article>) -> Snapshot {
    let mut snapshot = Snapshot {
        scraped_at: scraped_at.to_string(),
        window_hours: 24,
        article_count: articles.len() as u32,
        sources: BTreeMap::new(),
        articles,
        error: None,
    };
    snapshot.sources = snapshot.recount_sources();
    snapshot
}

fn transport_error() -> FetchError {
    FetchError::Transport(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "unreachable",
    ))
}

struct StaticFetcher {
    snapshot: Snapshot,
}

impl SnapshotFetcher for StaticFetcher {
    fn fetch(&self) -> FetchResult<Snapshot> {
        Ok(self.snapshot.clone())
    }
}

#[test]
fn cold_start_without_cache_stays_cold() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);

    engine.hydrate();
    assert_eq!(engine.state(), SyncState::Cold);
    assert!(engine.snapshot().is_none());
}

#[test]
fn hydrate_adopts_cached_articles_as_stale() {
    let cached = snapshot(
        "2026-02-19T09:00:00+00:00",
        vec![article("a1", Source::BensBites, "Yesterday's news")],
    );
    let store = MemoryStateStore::new();
    store.seed(KEY_ARTICLES, &cached.encode_articles().unwrap());
    store.seed(KEY_META, &cached.meta().encode().unwrap());

    let mut engine = SyncEngine::new(&store);
    engine.hydrate();

    assert_eq!(engine.state(), SyncState::HydratedStale);
    let hydrated = engine.snapshot().unwrap();
    assert_eq!(hydrated.scraped_at, "2026-02-19T09:00:00+00:00");
    assert_eq!(hydrated.articles, cached.articles);
    assert_eq!(hydrated.sources.get("bens_bites"), Some(&1));
}

#[test]
fn corrupt_cache_degrades_to_cold_start() {
    let store = MemoryStateStore::new();
    store.seed(KEY_ARTICLES, "{not json");

    let mut engine = SyncEngine::new(&store);
    engine.hydrate();
    assert_eq!(engine.state(), SyncState::Cold);
}

#[test]
fn successful_manual_refresh_goes_live_and_persists() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);
    let fresh = snapshot(
        "2026-02-20T09:00:00+00:00",
        vec![article("a1", Source::RundownAi, "Agents in production")],
    );

    let ticket = engine.begin_refresh(RefreshTrigger::Manual).unwrap();
    assert_eq!(engine.state(), SyncState::Loading);

    let event = engine.complete_refresh(ticket, Ok(fresh.clone()));
    assert_eq!(event, Some(SyncEvent::Refreshed { article_count: 1 }));
    assert_eq!(engine.state(), SyncState::Live);
    assert_eq!(engine.snapshot().unwrap().articles, fresh.articles);

    assert_eq!(
        store.read(KEY_ARTICLES).unwrap(),
        fresh.encode_articles().unwrap()
    );
    assert_eq!(store.read(KEY_META).unwrap(), fresh.meta().encode().unwrap());
}

#[test]
fn startup_refresh_emits_no_event() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);
    let fetcher = StaticFetcher {
        snapshot: snapshot("2026-02-20T09:00:00+00:00", Vec::new()),
    };

    assert_eq!(engine.refresh_with(&fetcher, RefreshTrigger::Startup), None);
    assert_eq!(engine.state(), SyncState::Live);
}

#[test]
fn fetching_the_same_snapshot_twice_is_idempotent() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);
    let fetcher = StaticFetcher {
        snapshot: snapshot(
            "2026-02-20T09:00:00+00:00",
            vec![article("a1", Source::BensBites, "GPT-5 Launch")],
        ),
    };

    engine.refresh_with(&fetcher, RefreshTrigger::Manual);
    let first_articles = store.read(KEY_ARTICLES).unwrap();
    let first_meta = store.read(KEY_META).unwrap();
    let first_snapshot = engine.snapshot().unwrap().clone();

    engine.refresh_with(&fetcher, RefreshTrigger::Manual);
    assert_eq!(store.read(KEY_ARTICLES).unwrap(), first_articles);
    assert_eq!(store.read(KEY_META).unwrap(), first_meta);
    assert_eq!(engine.snapshot().unwrap(), &first_snapshot);
}

#[test]
fn failed_refresh_retains_the_prior_snapshot_unchanged() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);
    let live = snapshot(
        "2026-02-20T09:00:00+00:00",
        vec![
            article("a1", Source::BensBites, "First"),
            article("a2", Source::RundownAi, "Second"),
        ],
    );

    let ticket = engine.begin_refresh(RefreshTrigger::Startup).unwrap();
    engine.complete_refresh(ticket, Ok(live.clone()));
    let persisted = store.read(KEY_ARTICLES).unwrap();

    let ticket = engine.begin_refresh(RefreshTrigger::Manual).unwrap();
    let event = engine.complete_refresh(ticket, Err(transport_error()));

    assert_eq!(event, Some(SyncEvent::RefreshFailed));
    assert_eq!(engine.state(), SyncState::Degraded);
    assert!(engine.is_degraded());
    assert_eq!(engine.snapshot().unwrap().articles, live.articles);
    assert_eq!(store.read(KEY_ARTICLES).unwrap(), persisted);
}

#[test]
fn cold_start_failure_installs_the_empty_shape() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);

    let ticket = engine.begin_refresh(RefreshTrigger::Manual).unwrap();
    let event = engine.complete_refresh(ticket, Err(transport_error()));

    assert_eq!(event, Some(SyncEvent::RefreshFailed));
    assert_eq!(engine.state(), SyncState::Degraded);

    let fallback = engine.snapshot().unwrap();
    assert_eq!(fallback.article_count, 0);
    assert!(fallback.articles.is_empty());
    assert!(fallback.error.is_some());

    // The fabricated document is display-only; nothing is cached.
    assert_eq!(store.read(KEY_ARTICLES), None);
}

#[test]
fn redundant_refresh_requests_are_coalesced() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);

    let ticket = engine.begin_refresh(RefreshTrigger::Manual).unwrap();
    assert!(engine.begin_refresh(RefreshTrigger::Manual).is_none());
    assert!(engine.begin_refresh(RefreshTrigger::Startup).is_none());

    engine.complete_refresh(ticket, Ok(snapshot("2026-02-20T09:00:00+00:00", Vec::new())));
    assert!(engine.begin_refresh(RefreshTrigger::Manual).is_some());
}

#[test]
fn stale_completion_cannot_clobber_a_newer_cycle() {
    let store = MemoryStateStore::new();
    let mut engine = SyncEngine::new(&store);

    let old_snapshot = snapshot("2026-02-20T06:00:00+00:00", Vec::new());
    let new_snapshot = snapshot(
        "2026-02-20T09:00:00+00:00",
        vec![article("a1", Source::BensBites, "Fresh")],
    );

    let first = engine.begin_refresh(RefreshTrigger::Manual).unwrap();
    engine.complete_refresh(first, Ok(new_snapshot.clone()));

    // A duplicate completion of the finished cycle lands after the fact.
    let dropped = engine.complete_refresh(first, Ok(old_snapshot));
    assert_eq!(dropped, None);
    assert_eq!(
        engine.snapshot().unwrap().scraped_at,
        "2026-02-20T09:00:00+00:00"
    );
    assert_eq!(engine.state(), SyncState::Live);
    assert_eq!(
        store.read(KEY_ARTICLES).unwrap(),
        new_snapshot.encode_articles().unwrap()
    );
}

#[test]
fn write_failures_do_not_interrupt_going_live() {
    let store = MemoryStateStore::new();
    store.set_fail_writes(true);
    let mut engine = SyncEngine::new(&store);

    let fresh = snapshot(
        "2026-02-20T09:00:00+00:00",
        vec![article("a1", Source::BensBites, "Unpersisted")],
    );
    let ticket = engine.begin_refresh(RefreshTrigger::Manual).unwrap();
    let event = engine.complete_refresh(ticket, Ok(fresh.clone()));

    assert_eq!(event, Some(SyncEvent::Refreshed { article_count: 1 }));
    assert_eq!(engine.state(), SyncState::Live);
    assert_eq!(engine.snapshot().unwrap().articles, fresh.articles);
    assert_eq!(store.read(KEY_ARTICLES), None);
}
