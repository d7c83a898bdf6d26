//! State store contract, SQLite implementation and in-memory fake.
//!
//! # Responsibility
//! - Provide the three durable records (articles, metadata, bookmarks) as
//!   opaque string values behind well-known keys.
//! - Isolate SQL details from the sync and bookmark owners.
//!
//! # Invariants
//! - `read` never surfaces an error; every failure degrades to `None` so
//!   callers treat it as a cold start.
//! - `write` reports success as `bool` only for diagnostics; callers must
//!   not roll back in-memory state on failure.

use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Durable record key for the cached article list (JSON array of articles).
pub const KEY_ARTICLES: &str = "feed.articles";
/// Durable record key for snapshot metadata (JSON `{"scraped_at": ...}`).
pub const KEY_META: &str = "feed.meta";
/// Durable record key for the bookmark set (JSON array of article ids).
pub const KEY_BOOKMARKS: &str = "feed.bookmarks";

/// Key/value contract for durable feed state.
pub trait StateStore {
    /// Reads one record, degrading every failure to `None`.
    fn read(&self, key: &str) -> Option<String>;

    /// Writes one record best-effort. Returns `false` when the write was
    /// dropped; the caller's in-memory state stands either way.
    fn write(&self, key: &str, value: &str) -> bool;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> bool {
        (**self).write(key, value)
    }
}

/// SQLite-backed state store over the `kv` table.
pub struct SqliteStateStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateStore for SqliteStateStore<'_> {
    fn read(&self, key: &str) -> Option<String> {
        let result = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional();

        match result {
            Ok(value) => value,
            Err(err) => {
                warn!("event=kv_read module=store status=degraded key={key} error={err}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> bool {
        let result = self.conn.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        );

        match result {
            Ok(_) => true,
            Err(err) => {
                warn!("event=kv_write module=store status=dropped key={key} error={err}");
                false
            }
        }
    }
}

/// In-memory state store for tests and ephemeral sessions.
///
/// Failure toggles emulate an unavailable backing store so degradation
/// policy can be exercised without a real database.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: RefCell<BTreeMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `read` behave as absent.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Makes every subsequent `write` get dropped.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Seeds one record directly, bypassing the failure toggles.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, key: &str) -> Option<String> {
        if self.fail_reads.get() {
            return None;
        }
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> bool {
        if self.fail_writes.get() {
            warn!("event=kv_write module=store status=dropped key={key} error=store_unavailable");
            return false;
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }
}
