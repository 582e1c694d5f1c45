//! Core index types.

use crate::snapshot::{ModelCapabilities, ModelPricing, ModelSpecs};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifies one routable model offering: a (channel, model) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelKey {
    /// Channel the offering belongs to
    pub channel_id: String,
    /// Model name within the channel
    pub model_name: String,
}

impl ModelKey {
    /// Create a new model key
    #[must_use]
    pub fn new(channel_id: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            model_name: model_name.into(),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.model_name)
    }
}

/// A channel health score with its capture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// Availability score from the external health checker
    pub score: f64,
    /// When the score was recorded
    pub cached_at: DateTime<Utc>,
}

impl HealthSample {
    /// Whether the sample is still within its time-to-live.
    ///
    /// A sample at exactly `ttl` age is already expired; the caller must
    /// re-probe rather than route on it.
    #[must_use]
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.cached_at) < ttl
    }
}

/// Everything the index knows about one model offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Channel the offering belongs to
    pub channel_id: String,
    /// Model name within the channel
    pub model_name: String,
    /// Provider identifier ("openai", "anthropic", ...)
    pub provider: String,
    /// Derived tag set (lower-case, deduplicated)
    pub tags: BTreeSet<String>,
    /// Pricing, when the channel advertises it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelPricing>,
    /// Capability flags, when the channel advertises them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<ModelCapabilities>,
    /// Specs (parameter count, context length), when advertised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<ModelSpecs>,
    /// Last health score broadcast onto this entry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthSample>,
}

impl ModelInfo {
    /// The key this entry is indexed under.
    #[must_use]
    pub fn key(&self) -> ModelKey {
        ModelKey::new(self.channel_id.clone(), self.model_name.clone())
    }
}

/// Snapshot of build results, kept for diagnostics and staleness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Indexed model offerings
    pub total_models: usize,
    /// Indexed channels
    pub total_channels: usize,
    /// Distinct tags
    pub total_tags: usize,
    /// Wall time of the build pass in milliseconds
    pub build_time_ms: u64,
    /// Rough heap footprint of the index structures
    pub estimated_memory_bytes: u64,
    /// When the build completed
    pub built_at: DateTime<Utc>,
    /// Snapshot records skipped as malformed
    pub skipped_records: usize,
    /// Model-name entries skipped as invalid
    pub skipped_models: usize,
}
