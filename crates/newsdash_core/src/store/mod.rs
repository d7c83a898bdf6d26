//! Durable key/value layer for feed state.
//!
//! # Responsibility
//! - Define the read/write contract used by the sync and bookmark owners.
//! - Keep the degradation policy in one place: absent-on-read, best-effort
//!   write.
//!
//! # Invariants
//! - A failed or corrupt read degrades to "absent", never to an error.
//! - A failed write never interrupts the in-memory mutation that caused it.

pub mod state_store;
