//! Raw snapshot records from the cache-loading collaborator.
//!
//! The cache loader periodically hands the index a snapshot mapping opaque
//! cache keys to per-channel JSON records. Records come from many scrapers
//! and admin tools and are not trusted: each one is validated on its own,
//! and a malformed record is reported to the builder rather than failing
//! the whole snapshot.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// A raw snapshot: opaque cache key -> per-channel record (arbitrary JSON).
pub type RawSnapshot = HashMap<String, Value>;

/// Why a snapshot record was rejected during a build pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record is not a JSON object
    #[error("record is not an object")]
    NotAnObject,

    /// The record has no model-name list
    #[error("record has no model list")]
    MissingModels,
}

/// Per-model pricing, as advertised by the channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Input cost per million tokens
    #[serde(default)]
    pub input_per_million: Option<f64>,
    /// Output cost per million tokens
    #[serde(default)]
    pub output_per_million: Option<f64>,
    /// Currency code when not USD
    #[serde(default)]
    pub currency: Option<String>,
}

/// Per-model capability flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Accepts image input
    #[serde(default)]
    pub vision: bool,
    /// Supports function calling / tools
    #[serde(default)]
    pub function_calling: bool,
    /// Supports streamed responses
    #[serde(default)]
    pub streaming: bool,
    /// Provider-specific flags carried through without interpretation
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Per-model specs reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSpecs {
    /// Parameter count, when the provider reports one
    #[serde(default)]
    pub parameter_count: Option<u64>,
    /// Context window length in tokens
    #[serde(default)]
    pub context_length: Option<u64>,
}

/// One validated per-channel record.
#[derive(Debug, Clone, Default)]
pub struct ChannelRecord {
    /// Provider identifier ("openai", "anthropic", ...); empty when absent
    pub provider: String,
    /// Model names offered by the channel
    pub models: Vec<String>,
    /// Count of non-string or empty model-name entries that were dropped
    pub skipped_models: usize,
    /// Per-model pricing side map
    pub pricing: HashMap<String, ModelPricing>,
    /// Per-model capability side map
    pub capabilities: HashMap<String, ModelCapabilities>,
    /// Per-model spec side map
    pub specs: HashMap<String, ModelSpecs>,
}

impl ChannelRecord {
    /// Validate one raw record.
    ///
    /// A record must be an object with a `models` array; everything else is
    /// optional. Invalid model names and unparseable side-map entries are
    /// dropped individually instead of rejecting the record.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let obj = value.as_object().ok_or(RecordError::NotAnObject)?;
        let raw_models = obj
            .get("models")
            .and_then(Value::as_array)
            .ok_or(RecordError::MissingModels)?;

        let mut models = Vec::with_capacity(raw_models.len());
        let mut skipped_models = 0;
        for entry in raw_models {
            match entry.as_str() {
                Some(name) if !name.is_empty() => models.push(name.to_string()),
                _ => skipped_models += 1,
            }
        }

        let provider = obj
            .get("provider")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            provider,
            models,
            skipped_models,
            pricing: side_map(obj.get("pricing")),
            capabilities: side_map(obj.get("capabilities")),
            specs: side_map(obj.get("specs")),
        })
    }
}

/// Parse an optional model-name -> record side map, dropping entries that
/// fail to deserialize.
fn side_map<T: DeserializeOwned>(value: Option<&Value>) -> HashMap<String, T> {
    let Some(map) = value.and_then(Value::as_object) else {
        return HashMap::new();
    };
    map.iter()
        .filter_map(|(model, entry)| match serde_json::from_value(entry.clone()) {
            Ok(parsed) => Some((model.clone(), parsed)),
            Err(err) => {
                debug!(model = %model, error = %err, "Dropping unparseable side-map entry");
                None
            }
        })
        .collect()
}

/// Derive the channel id from an opaque cache key.
///
/// The cache loader suffixes keys with `_` plus a random 8-character
/// lowercase-hex discriminator (`"openai_1a2b3c4d"`); a key without that
/// suffix is already a channel id.
#[must_use]
pub fn channel_id_from_key(key: &str) -> &str {
    match key.rsplit_once('_') {
        Some((prefix, suffix)) if !prefix.is_empty() && is_hex_suffix(suffix) => prefix,
        _ => key,
    }
}

fn is_hex_suffix(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
