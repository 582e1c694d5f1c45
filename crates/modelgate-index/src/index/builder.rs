//! Index build pass.
//!
//! One pass over the raw snapshot produces all three index structures and
//! the build stats together. The caller swaps the tables into shared state
//! in a single assignment, so a tag bucket can never reference a model the
//! info table does not hold.

use super::types::{IndexStats, ModelInfo, ModelKey};
use crate::snapshot::{channel_id_from_key, ChannelRecord, RawSnapshot};
use crate::tags::derive_tags;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use tracing::{debug, warn};

/// The three index structures, always built and replaced as one unit.
#[derive(Debug, Default)]
pub(crate) struct IndexTables {
    /// tag -> model keys carrying it
    pub tags: HashMap<String, BTreeSet<ModelKey>>,
    /// channel id -> model names it offers
    pub channels: HashMap<String, BTreeSet<String>>,
    /// model key -> full entry
    pub models: HashMap<ModelKey, ModelInfo>,
}

/// Build fresh index tables from a raw snapshot.
///
/// Malformed records are skipped and counted; a build always completes
/// with an index over the valid subset.
pub(crate) fn build_tables(raw: &RawSnapshot) -> (IndexTables, IndexStats) {
    let started = Instant::now();
    let mut tables = IndexTables::default();
    let mut skipped_records = 0;
    let mut skipped_models = 0;

    for (key, value) in raw {
        let record = match ChannelRecord::from_value(value) {
            Ok(record) => record,
            Err(err) => {
                warn!(key = %key, error = %err, "Skipping malformed snapshot record");
                skipped_records += 1;
                continue;
            }
        };
        if record.skipped_models > 0 {
            debug!(
                key = %key,
                count = record.skipped_models,
                "Dropped invalid model-name entries"
            );
            skipped_models += record.skipped_models;
        }

        let channel_id = channel_id_from_key(key);
        for model_name in &record.models {
            let info = ModelInfo {
                channel_id: channel_id.to_string(),
                model_name: model_name.clone(),
                provider: record.provider.clone(),
                tags: derive_tags(model_name, &record.provider),
                pricing: record.pricing.get(model_name).cloned(),
                capabilities: record.capabilities.get(model_name).cloned(),
                specs: record.specs.get(model_name).cloned(),
                health: None,
            };
            insert(&mut tables, info);
        }
    }

    let stats = IndexStats {
        total_models: tables.models.len(),
        total_channels: tables.channels.len(),
        total_tags: tables.tags.len(),
        build_time_ms: started.elapsed().as_millis() as u64,
        estimated_memory_bytes: estimate_memory(&tables),
        built_at: Utc::now(),
        skipped_records,
        skipped_models,
    };
    (tables, stats)
}

/// Insert one entry into all three structures together.
fn insert(tables: &mut IndexTables, info: ModelInfo) {
    let key = info.key();
    for tag in &info.tags {
        tables
            .tags
            .entry(tag.clone())
            .or_default()
            .insert(key.clone());
    }
    tables
        .channels
        .entry(info.channel_id.clone())
        .or_default()
        .insert(info.model_name.clone());
    tables.models.insert(key, info);
}

/// Rough heap footprint: string payloads plus a fixed per-entry overhead.
fn estimate_memory(tables: &IndexTables) -> u64 {
    const ENTRY_OVERHEAD: u64 = 48;

    let mut bytes = 0u64;
    for (tag, keys) in &tables.tags {
        bytes += tag.len() as u64 + ENTRY_OVERHEAD;
        bytes += keys.len() as u64 * ENTRY_OVERHEAD;
    }
    for (channel, names) in &tables.channels {
        bytes += channel.len() as u64 + ENTRY_OVERHEAD;
        bytes += names
            .iter()
            .map(|name| name.len() as u64 + ENTRY_OVERHEAD)
            .sum::<u64>();
    }
    for (key, info) in &tables.models {
        bytes += (key.channel_id.len() + key.model_name.len()) as u64 + 2 * ENTRY_OVERHEAD;
        bytes += info.provider.len() as u64;
        bytes += info.tags.iter().map(|tag| tag.len() as u64).sum::<u64>();
    }
    bytes
}
