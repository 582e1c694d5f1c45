//! Channel health scores.
//!
//! Health is a channel-level property produced by the external health
//! checker. A score is denormalized onto every model entry of the channel
//! so routing reads stay a single map lookup; a rebuild discards the
//! scores along with the entries they were written on.

use super::builder::IndexTables;
use super::index_impl::IndexState;
use super::types::{HealthSample, ModelKey};
use chrono::{DateTime, Duration, Utc};

impl IndexState {
    /// Broadcast a score across every model of the channel.
    ///
    /// Returns how many entries were updated; zero for unknown channels.
    pub(crate) fn set_health_score_at(
        &mut self,
        channel_id: &str,
        score: f64,
        now: DateTime<Utc>,
    ) -> usize {
        let IndexTables {
            channels, models, ..
        } = &mut self.tables;
        let Some(names) = channels.get(channel_id) else {
            return 0;
        };

        let sample = HealthSample {
            score,
            cached_at: now,
        };
        let mut updated = 0;
        for name in names {
            let key = ModelKey::new(channel_id, name.as_str());
            if let Some(info) = models.get_mut(&key) {
                info.health = Some(sample);
                updated += 1;
            }
        }
        updated
    }

    /// The channel's cached score, only while fresher than `ttl`.
    ///
    /// Every entry of a channel carries the same sample, so reading any
    /// one of them suffices.
    pub(crate) fn health_score_at(
        &self,
        channel_id: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        let names = self.tables.channels.get(channel_id)?;
        let name = names.iter().next()?;
        let key = ModelKey::new(channel_id, name.as_str());
        let sample = self.tables.models.get(&key)?.health?;
        sample.is_fresh(ttl, now).then_some(sample.score)
    }
}
