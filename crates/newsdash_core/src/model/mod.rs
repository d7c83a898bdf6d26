//! Feed domain model and snapshot wire codec.
//!
//! # Responsibility
//! - Define the immutable article/snapshot shapes delivered by the pipeline.
//! - Keep JSON wire details inside the model boundary.
//!
//! # Invariants
//! - Articles are identified by a stable, externally minted `ArticleId`.
//! - Snapshots are replaced whole; no field-level merge exists anywhere.

pub mod article;
pub mod snapshot;
