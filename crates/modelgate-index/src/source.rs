//! Snapshot source trait.
//!
//! The index never performs I/O itself. A `RawCacheSource` collaborator
//! (disk cache reader, admin API client, scraper output) loads snapshots
//! and hands them over for indexing.

use crate::error::Result;
use crate::snapshot::RawSnapshot;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Trait for collaborators that produce raw model snapshots.
#[async_trait::async_trait]
pub trait RawCacheSource: Send + Sync {
    /// A short source name for logging.
    fn name(&self) -> &str;

    /// Load the current snapshot.
    async fn load_snapshot(&self) -> Result<RawSnapshot>;
}

/// A source serving queued snapshots, for tests and local development.
pub struct MockCacheSource {
    responses: Mutex<VecDeque<Result<RawSnapshot>>>,
}

impl Default for MockCacheSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCacheSource {
    /// Create a new mock source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a snapshot to serve.
    pub fn push_snapshot(&self, snapshot: RawSnapshot) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(snapshot));
    }

    /// Queue a load failure.
    pub fn push_error(&self, error: crate::error::Error) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }
}

#[async_trait::async_trait]
impl RawCacheSource for MockCacheSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load_snapshot(&self) -> Result<RawSnapshot> {
        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        // Default behavior if queue empty
        responses.pop_front().unwrap_or_else(|| Ok(RawSnapshot::new()))
    }
}
