//! In-memory record repository.
//!
//! The reference backing store for the engine: an insertion-ordered table
//! keyed by source url. No locking — the tracker facade serializes access.

use fetchcache_core::domain::{CacheError, CacheResult, DownloadRecord};
use fetchcache_core::ports::RecordRepository;
use indexmap::IndexMap;

/// Record table held in process memory.
///
/// Insertion order is preserved so that scans (and therefore cleanup
/// sweeps and quota recomputes) are deterministic.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: IndexMap<String, DownloadRecord>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl RecordRepository for InMemoryRecordStore {
    fn get(&self, source_url: &str) -> Option<DownloadRecord> {
        self.records.get(source_url).cloned()
    }

    fn insert(&mut self, record: DownloadRecord) -> CacheResult<()> {
        if self.records.contains_key(&record.source_url) {
            // Two registrations raced past the engine's serialization.
            return Err(CacheError::invariant(format!(
                "record already exists for source url: {}",
                record.source_url
            )));
        }
        self.records.insert(record.source_url.clone(), record);
        Ok(())
    }

    fn upsert(&mut self, record: DownloadRecord) {
        self.records.insert(record.source_url.clone(), record);
    }

    fn scan(&self) -> Vec<DownloadRecord> {
        self.records.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
