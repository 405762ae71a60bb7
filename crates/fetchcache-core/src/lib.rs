//! Core domain types and port definitions for the fetch-cache engine.
//!
//! This crate holds the pure data model (records, checkpoints, cleanup
//! policies, quota) and the trait seams (`Clock`, `ContentHasher`,
//! `RecordRepository`, `FetchCachePort`) that the tracker engine and any
//! external persistence layer plug into. No I/O, no locking, no runtime.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    CacheError, CacheResult, CleanupAction, CleanupPolicy, CleanupResult, DownloadMetadata,
    DownloadRecord, RecordStatus, ResumeState, StorageQuota, UpdateCheck, UpdateReason,
};
pub use ports::{
    Clock, ContentHasher, FetchCachePort, ManualClock, RecordRepository, Sha256Hasher,
    SystemClock, TrackerConfig,
};
