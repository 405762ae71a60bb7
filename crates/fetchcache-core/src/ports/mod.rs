//! Port definitions (trait abstractions) for the fetch-cache engine.
//!
//! Ports define the seams between the policy logic and its environment.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No lock or runtime types in any signature
//! - Wall-clock time and hash synthesis are injected, never ambient
//! - The record repository is intent-based, not generic CRUD

pub mod clock;
pub mod hasher;
pub mod repository;
pub mod tracker;

// Re-export port traits for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use hasher::{ContentHasher, Sha256Hasher};
pub use repository::RecordRepository;
pub use tracker::{FetchCachePort, TrackerConfig};
