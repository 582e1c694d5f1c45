//! Rebuild heuristics.
//!
//! The staleness check trades exactness for stability: minor drift between
//! the raw snapshot and the built index is tolerated so transient provider
//! flapping does not trigger a rebuild on every cache-refresh cycle.

use super::types::IndexStats;
use crate::snapshot::RawSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Thresholds for the rebuild heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StalenessConfig {
    /// Rebuild when current/previous channel count falls below this ratio
    #[serde(default = "default_shrink_ratio")]
    pub shrink_ratio: f64,
    /// Rebuild when current/previous channel count exceeds this ratio
    #[serde(default = "default_growth_ratio")]
    pub growth_ratio: f64,
    /// Rebuild when the relative model-count delta exceeds this fraction
    #[serde(default = "default_model_delta")]
    pub model_delta: f64,
}

fn default_shrink_ratio() -> f64 {
    0.7
}

fn default_growth_ratio() -> f64 {
    1.5
}

fn default_model_delta() -> f64 {
    0.1
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            shrink_ratio: default_shrink_ratio(),
            growth_ratio: default_growth_ratio(),
            model_delta: default_model_delta(),
        }
    }
}

/// Total models advertised by a snapshot, counting malformed records as zero.
pub(crate) fn snapshot_model_count(raw: &RawSnapshot) -> usize {
    raw.values()
        .filter_map(|record| record.get("models").and_then(Value::as_array))
        .map(Vec::len)
        .sum()
}

/// Decide whether the snapshot has drifted enough to justify a rebuild.
pub(crate) fn needs_rebuild(
    prev: Option<&IndexStats>,
    raw: &RawSnapshot,
    config: &StalenessConfig,
) -> bool {
    // Never built, or built over nothing usable.
    let Some(prev) = prev else {
        return true;
    };
    if prev.total_models == 0 || prev.total_channels == 0 {
        return true;
    }

    let channel_ratio = raw.len() as f64 / prev.total_channels as f64;
    if channel_ratio < config.shrink_ratio {
        debug!(channel_ratio, "Channel count shrank, rebuild needed");
        return true;
    }
    if channel_ratio > config.growth_ratio {
        debug!(channel_ratio, "Channel count grew, rebuild needed");
        return true;
    }

    let current_models = snapshot_model_count(raw);
    let model_delta =
        (current_models as f64 - prev.total_models as f64).abs() / prev.total_models as f64;
    if model_delta > config.model_delta {
        debug!(model_delta, "Model count drifted, rebuild needed");
        return true;
    }

    false
}
