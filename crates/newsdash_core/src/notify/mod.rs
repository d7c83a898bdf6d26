//! Ephemeral user-facing notifications.
//!
//! # Responsibility
//! - Hold the single, auto-expiring notification slot.
//!
//! # Invariants
//! - Last write wins; there is no queue of pending messages.

pub mod channel;
