//! Derived, disposable view of the feed.
//!
//! # Responsibility
//! - Project snapshot plus bookmark set into display-ready article lists.
//! - Keep ephemeral view state types in one place.
//!
//! # Invariants
//! - Projection is pure: no side effects, no persistence, no ownership of
//!   feed data.

pub mod projector;
