//! Modelgate Index - in-memory model index for the routing gateway
//!
//! Modelgate fans requests out across many credentialed provider channels
//! (OpenAI, Anthropic, Groq, OpenRouter, SiliconFlow, ...) and picks a
//! channel/model pair per request with tag selectors like
//! `tag:qwen,free,!embedding`. This crate holds the index that makes those
//! selectors fast:
//!
//! - Snapshot: validated per-channel records from the cache loader
//! - Tags: deterministic tag derivation from model names
//! - Index: one-pass builds, tag intersection queries, channel health
//!   scores with TTL semantics, and rebuild-or-tolerate staleness checks
//! - Refresh: the periodic load/check/build cycle
//!
//! The index is purely in-memory: it starts empty, is wholly replaced on
//! each successful build, and is rebuilt from source on process start.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod refresh;
pub mod selector;
pub mod snapshot;
pub mod source;
pub mod tags;

pub use error::{Error, Result};
pub use index::{HealthSample, IndexStats, ModelIndex, ModelInfo, ModelKey, StalenessConfig};
pub use refresh::{refresh_once, run_refresh_loop};
pub use selector::TagSelector;
pub use snapshot::{
    channel_id_from_key, ChannelRecord, ModelCapabilities, ModelPricing, ModelSpecs, RawSnapshot,
    RecordError,
};
pub use source::{MockCacheSource, RawCacheSource};
pub use tags::derive_tags;
