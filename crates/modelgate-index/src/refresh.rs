//! Periodic refresh loop.
//!
//! Drives the decision cycle: load a snapshot from the cache source, ask
//! the staleness heuristic whether the index has drifted, and rebuild only
//! when it has.

use crate::error::Result;
use crate::index::{IndexStats, ModelIndex};
use crate::source::RawCacheSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Run one load/check/build cycle.
///
/// Returns the new stats when a rebuild happened, `None` when the index
/// was judged fresh enough.
#[instrument(skip_all, fields(source = source.name()))]
pub async fn refresh_once(
    index: &ModelIndex,
    source: &dyn RawCacheSource,
) -> Result<Option<IndexStats>> {
    let snapshot = source.load_snapshot().await?;
    if !index.needs_rebuild(&snapshot) {
        debug!("Index still fresh, skipping rebuild");
        return Ok(None);
    }
    Ok(Some(index.build(&snapshot)))
}

/// Drive `refresh_once` on a fixed interval until the task is dropped.
///
/// A failed snapshot load is logged and skipped; the current index keeps
/// serving queries until the next cycle.
pub async fn run_refresh_loop(
    index: Arc<ModelIndex>,
    source: Arc<dyn RawCacheSource>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(err) = refresh_once(index.as_ref(), source.as_ref()).await {
            warn!(error = %err, "Snapshot load failed, keeping current index");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::source::MockCacheSource;
    use serde_json::json;

    fn snapshot(models: &[&str]) -> crate::snapshot::RawSnapshot {
        [(
            "chan".to_string(),
            json!({"models": models, "provider": "openai"}),
        )]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_refresh_builds_empty_index() {
        let index = ModelIndex::new();
        let source = MockCacheSource::new();
        source.push_snapshot(snapshot(&["gpt-4o"]));

        let stats = refresh_once(&index, &source).await.unwrap();
        assert_eq!(stats.unwrap().total_models, 1);
        assert!(index.is_built());
    }

    #[tokio::test]
    async fn test_refresh_skips_fresh_index() {
        let index = ModelIndex::new();
        let source = MockCacheSource::new();
        source.push_snapshot(snapshot(&["gpt-4o", "gpt-4o-mini"]));
        source.push_snapshot(snapshot(&["gpt-4o", "gpt-4o-mini"]));

        assert!(refresh_once(&index, &source).await.unwrap().is_some());
        // Identical snapshot: heuristic says keep the current index
        assert!(refresh_once(&index, &source).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_error_leaves_index_untouched() {
        let index = ModelIndex::new();
        let source = MockCacheSource::new();
        source.push_snapshot(snapshot(&["gpt-4o"]));
        source.push_error(Error::Source("cache unavailable".to_string()));

        refresh_once(&index, &source).await.unwrap();
        let before = index.stats();
        assert!(refresh_once(&index, &source).await.is_err());
        assert_eq!(index.stats(), before);
    }
}
