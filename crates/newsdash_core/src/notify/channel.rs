//! Single-slot, time-boxed notification channel.
//!
//! # Responsibility
//! - Hold at most one user-facing message at a time.
//! - Expire it automatically after a fixed duration unless replaced sooner.
//!
//! # Invariants
//! - Publishing replaces any currently displayed message (last write wins).
//! - Expiry is evaluated against a caller-provided clock so it is testable
//!   without sleeping.

use std::time::{Duration, Instant};

/// How long one notification stays visible.
pub const NOTICE_TTL: Duration = Duration::from_millis(2800);

/// The single ephemeral message slot.
#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<(String, Instant)>,
}

impl NoticeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a message at `now`, replacing any current one.
    pub fn publish(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some((text.into(), now));
    }

    /// Returns the visible message, or `None` once it has expired.
    pub fn current(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((text, shown_at)) if now.duration_since(*shown_at) < NOTICE_TTL => {
                Some(text.as_str())
            }
            _ => None,
        }
    }

    /// Drops the current message early.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
