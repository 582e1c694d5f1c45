//! Model index - concurrent tag index over discovered models
//!
//! This module turns raw channel snapshots into microsecond tag-intersection
//! queries for the routing layer. The index starts empty, is wholly replaced
//! on each successful build, and is never persisted.
//!
//! # Module Structure
//!
//! - `types`: Core types (ModelKey, ModelInfo, IndexStats)
//! - `builder`: One-pass build from a raw snapshot
//! - `resolver`: Tag intersection/exclusion queries
//! - `health`: Channel health scores with TTL semantics
//! - `staleness`: Rebuild-or-tolerate heuristics
//! - `index_impl`: The shared `ModelIndex` handle

mod builder;
mod health;
mod index_impl;
mod resolver;
mod staleness;
mod types;


pub use index_impl::ModelIndex;
pub use staleness::StalenessConfig;
pub use types::{HealthSample, IndexStats, ModelInfo, ModelKey};
