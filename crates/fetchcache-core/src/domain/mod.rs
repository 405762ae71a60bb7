//! Fetch-cache domain types.
//!
//! Pure data types with no I/O dependencies. The engine crate owns all
//! mutation logic; everything here is bookkeeping structure.
//!
//! # Structure
//!
//! - `record` - The tracked-resource table entry (`DownloadRecord`, `RecordStatus`)
//! - `freshness` - Conditional-fetch verdicts (`UpdateCheck`, `UpdateReason`)
//! - `resume` - Interrupted-transfer checkpoints (`ResumeState`)
//! - `cleanup` - Eviction policies and audit results
//! - `quota` - Aggregate storage accounting (`StorageQuota`)
//! - `errors` - Error types for engine-contract violations

pub mod cleanup;
pub mod errors;
pub mod freshness;
pub mod quota;
pub mod record;
pub mod resume;

// Re-export commonly used types
pub use cleanup::{CleanupAction, CleanupPolicy, CleanupResult};
pub use errors::{CacheError, CacheResult};
pub use freshness::{DownloadMetadata, UpdateCheck, UpdateReason};
pub use quota::StorageQuota;
pub use record::{DownloadRecord, RecordStatus};
pub use resume::ResumeState;
