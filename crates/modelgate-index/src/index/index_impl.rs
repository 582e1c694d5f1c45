//! The shared model index.
//!
//! This module contains the `ModelIndex` handle owned by the routing
//! service and shared (as `Arc<ModelIndex>`) with the router and the
//! health checker.

use super::builder::{build_tables, IndexTables};
use super::staleness::{needs_rebuild, StalenessConfig};
use super::types::{IndexStats, ModelInfo, ModelKey};
use crate::selector::TagSelector;
use crate::snapshot::RawSnapshot;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

/// In-memory model index shared between the router and the health checker.
///
/// All state sits behind one mutex. A build assembles fresh tables outside
/// the lock and swaps them in as one assignment, so readers observe either
/// the fully-old or the fully-new index, never a mix. Nothing here performs
/// I/O or holds the lock across an await point.
#[derive(Debug, Default)]
pub struct ModelIndex {
    state: Mutex<IndexState>,
    staleness: StalenessConfig,
}

/// Index tables plus the stats of the build that produced them.
///
/// `stats` is `None` until the first build; all queries are legal in that
/// state and resolve to empty/absent.
#[derive(Debug, Default)]
pub(crate) struct IndexState {
    pub(crate) tables: IndexTables,
    pub(crate) stats: Option<IndexStats>,
}

impl ModelIndex {
    /// Create an empty index with default staleness thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the staleness thresholds.
    #[must_use]
    pub fn with_staleness_config(mut self, config: StalenessConfig) -> Self {
        self.staleness = config;
        self
    }

    /// The configured staleness thresholds.
    #[must_use]
    pub fn staleness_config(&self) -> &StalenessConfig {
        &self.staleness
    }

    // State is only ever replaced wholesale, so a poisoned lock cannot
    // expose a torn index; recover instead of propagating.
    fn lock(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rebuild the index from a raw snapshot, replacing all shared state.
    ///
    /// Malformed records are skipped and counted in the returned stats; a
    /// build always completes with an index over the valid subset. Cached
    /// health scores do not survive the rebuild.
    #[instrument(skip_all)]
    pub fn build(&self, raw: &RawSnapshot) -> IndexStats {
        let (tables, stats) = build_tables(raw);
        {
            let mut state = self.lock();
            state.tables = tables;
            state.stats = Some(stats.clone());
        }
        info!(
            total_models = stats.total_models,
            total_channels = stats.total_channels,
            total_tags = stats.total_tags,
            skipped_records = stats.skipped_records,
            skipped_models = stats.skipped_models,
            build_time_ms = stats.build_time_ms,
            "Model index rebuilt"
        );
        stats
    }

    /// Whether the snapshot has drifted enough from the last build to be
    /// worth re-indexing.
    #[must_use]
    pub fn needs_rebuild(&self, raw: &RawSnapshot) -> bool {
        let state = self.lock();
        needs_rebuild(state.stats.as_ref(), raw, &self.staleness)
    }

    /// Resolve a tag intersection/exclusion query.
    ///
    /// Tags are lower-cased before lookup. The returned set is an owned
    /// snapshot; an empty `include` always resolves to nothing.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, include: &[S], exclude: &[S]) -> BTreeSet<ModelKey> {
        let include = normalize(include);
        let exclude = normalize(exclude);
        self.lock().resolve(&include, &exclude)
    }

    /// Resolve a parsed selector.
    #[must_use]
    pub fn resolve_selector(&self, selector: &TagSelector) -> BTreeSet<ModelKey> {
        self.resolve(&selector.include, &selector.exclude)
    }

    /// Look up one model entry.
    #[must_use]
    pub fn model_info(&self, channel_id: &str, model_name: &str) -> Option<ModelInfo> {
        self.lock()
            .tables
            .models
            .get(&ModelKey::new(channel_id, model_name))
            .cloned()
    }

    /// Model names indexed for a channel, sorted.
    #[must_use]
    pub fn channel_models(&self, channel_id: &str) -> Vec<String> {
        self.lock()
            .tables
            .channels
            .get(channel_id)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The channel's cached health score, only while fresher than `ttl`.
    ///
    /// `None` means the caller must re-probe via the health checker; a
    /// stale score is never returned.
    #[must_use]
    pub fn health_score(&self, channel_id: &str, ttl: Duration) -> Option<f64> {
        self.health_score_at(channel_id, ttl, Utc::now())
    }

    pub(crate) fn health_score_at(
        &self,
        channel_id: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        self.lock().health_score_at(channel_id, ttl, now)
    }

    /// Record a health score for every model of a channel.
    pub fn set_health_score(&self, channel_id: &str, score: f64) {
        self.set_health_score_at(channel_id, score, Utc::now());
    }

    pub(crate) fn set_health_score_at(&self, channel_id: &str, score: f64, now: DateTime<Utc>) {
        let updated = self.lock().set_health_score_at(channel_id, score, now);
        debug!(channel = %channel_id, score, updated, "Health score updated");
    }

    /// Stats from the last successful build, `None` before the first one.
    #[must_use]
    pub fn stats(&self) -> Option<IndexStats> {
        self.lock().stats.clone()
    }

    /// Whether the index has been built at least once.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.lock().stats.is_some()
    }
}

fn normalize<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}
