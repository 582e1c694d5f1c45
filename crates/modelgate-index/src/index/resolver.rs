//! Tag intersection/exclusion queries.

use super::index_impl::IndexState;
use super::types::ModelKey;
use std::collections::BTreeSet;

impl IndexState {
    /// Resolve an intersection of include tags minus the exclude tags.
    ///
    /// Tags are assumed to be normalized (lower-case, trimmed). An empty
    /// include set resolves to nothing by design: callers must supply at
    /// least one positive criterion.
    pub(crate) fn resolve(&self, include: &[String], exclude: &[String]) -> BTreeSet<ModelKey> {
        if include.is_empty() {
            return BTreeSet::new();
        }

        // Any missing include bucket empties the whole intersection.
        let mut buckets = Vec::with_capacity(include.len());
        for tag in include {
            match self.tables.tags.get(tag) {
                Some(bucket) if !bucket.is_empty() => buckets.push(bucket),
                _ => return BTreeSet::new(),
            }
        }

        // Seed from the smallest bucket and abort as soon as nothing is left.
        buckets.sort_by_key(|bucket| bucket.len());
        let mut buckets = buckets.into_iter();
        let mut result = match buckets.next() {
            Some(seed) => seed.clone(),
            None => return BTreeSet::new(),
        };
        for bucket in buckets {
            result.retain(|key| bucket.contains(key));
            if result.is_empty() {
                return result;
            }
        }

        for tag in exclude {
            if let Some(bucket) = self.tables.tags.get(tag) {
                for key in bucket {
                    result.remove(key);
                }
                if result.is_empty() {
                    break;
                }
            }
        }
        result
    }
}
