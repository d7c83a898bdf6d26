//! Durable bookmark ownership.
//!
//! # Responsibility
//! - Keep the bookmark set independent of snapshot churn.
//! - Persist membership write-through after every mutation.
//!
//! # Invariants
//! - The bookmark set has exactly one owner: the bookmark manager.
//! - Entries are immortal; an id that aged out of every snapshot is never
//!   garbage collected.

pub mod manager;
