//! Record repository port definition.
//!
//! This port abstracts the authoritative table of tracked resources so a
//! durable backing store can be substituted without changing the policy
//! logic that runs on top of it.
//!
//! # Design
//!
//! - Intent-based methods, not generic CRUD
//! - Synchronous: implementations hold state in memory (or a write-through
//!   cache of it); the engine serializes access around them
//! - Records are never removed — eviction flips `status`, and `scan`
//!   always returns the full table including deleted records

use crate::domain::{CacheResult, DownloadRecord};

/// Port for the authoritative record table, keyed by source url.
///
/// Implementations must preserve one invariant: at most one record per
/// `source_url`. `insert` is the guarded path that fails loudly when that
/// is about to be broken; `upsert` is the update path for records the
/// caller already looked up.
pub trait RecordRepository: Send + Sync {
    /// Look up the record for a source url.
    fn get(&self, source_url: &str) -> Option<DownloadRecord>;

    /// Insert a record for a url that must not already be tracked.
    ///
    /// Returns an invariant violation if a record for `source_url` already
    /// exists — that means two registrations raced past the engine's
    /// serialization, which is a contract failure, not a runtime condition.
    fn insert(&mut self, record: DownloadRecord) -> CacheResult<()>;

    /// Write back a (possibly mutated) record, replacing any existing
    /// record for the same url.
    fn upsert(&mut self, record: DownloadRecord);

    /// Snapshot every record in insertion order, deleted ones included.
    fn scan(&self) -> Vec<DownloadRecord>;

    /// Number of records tracked (all statuses).
    fn len(&self) -> usize;

    /// Whether the table is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
