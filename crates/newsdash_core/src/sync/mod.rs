//! Feed synchronization: delivery seam and refresh state machine.
//!
//! # Responsibility
//! - Define the fetch contract for the external delivery mechanism.
//! - Reconcile fetched snapshots against cached state with durable
//!   write-through.
//!
//! # Invariants
//! - The snapshot store has exactly one owner: the sync engine.
//! - No failure path ever clears data the engine already holds.

pub mod engine;
pub mod fetch;
