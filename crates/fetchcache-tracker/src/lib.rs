//! Fetch-cache-and-eviction engine.
//!
//! Tracks remote resources fetched into local storage, decides when a
//! cached copy can be trusted versus must be re-fetched, deduplicates
//! identical content arriving from different sources, checkpoints
//! interrupted transfers, and enforces a storage budget through
//! configurable cleanup policies.
//!
//! The engine never issues network requests and never touches file
//! content: it accepts metadata (url, validators, size, hash) and local
//! path strings from a caller and returns decisions and bookkeeping
//! records. All mutable state lives behind a single lock in
//! [`FetchCacheTracker`]; the state machines underneath
//! ([`InMemoryRecordStore`], [`ResumeTracker`], [`CleanupSet`]) are pure
//! and synchronous.

// Re-export core types for convenience
pub use fetchcache_core::domain::{
    CacheError, CacheResult, CleanupAction, CleanupPolicy, CleanupResult, DownloadMetadata,
    DownloadRecord, RecordStatus, ResumeState, StorageQuota, UpdateCheck, UpdateReason,
};
pub use fetchcache_core::ports::{
    Clock, ContentHasher, FetchCachePort, ManualClock, RecordRepository, Sha256Hasher,
    SystemClock, TrackerConfig,
};

// Internal state machines
mod cleanup;
mod quota;
mod resume;
mod store;

pub use cleanup::CleanupSet;
pub use resume::ResumeTracker;
pub use store::InMemoryRecordStore;

// Public API - the async facade
mod tracker;

pub use tracker::{FetchCacheTracker, TrackerDeps, build_tracker};
