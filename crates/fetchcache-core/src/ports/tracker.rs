//! Fetch-cache port definition.
//!
//! This port is the narrow API surface a crawler/fetch component consumes.
//! It abstracts away all implementation details (locking, repository
//! choice, clock) behind a clean async API.
//!
//! # Design
//!
//! - Only core domain types in signatures
//! - Absent records, unknown policies and missing checkpoints come back
//!   as `None`/`false`, never as errors
//! - `Err` is reserved for engine invariant violations

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    CacheResult, CleanupPolicy, CleanupResult, DownloadMetadata, DownloadRecord, ResumeState,
    StorageQuota, UpdateCheck,
};

/// Configuration for creating a fetch-cache tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Storage budget in bytes.
    pub max_quota_bytes: u64,
    /// Fraction of the budget at which quota warnings trip.
    pub warning_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            // 10 GiB
            max_quota_bytes: 10 * 1024 * 1024 * 1024,
            warning_threshold: 0.8,
        }
    }
}

impl TrackerConfig {
    /// Create a config with the given storage budget.
    #[must_use]
    pub fn new(max_quota_bytes: u64) -> Self {
        Self {
            max_quota_bytes,
            ..Default::default()
        }
    }

    /// Set the warning threshold fraction.
    #[must_use]
    pub const fn with_warning_threshold(mut self, warning_threshold: f64) -> Self {
        self.warning_threshold = warning_threshold;
        self
    }
}

/// Port for the fetch-cache-and-eviction engine.
///
/// All mutating operations are serialized by the implementation: a
/// registration never interleaves with a cleanup scan, and reads observe
/// snapshot-consistent records. No operation performs network or disk
/// access.
#[async_trait]
pub trait FetchCachePort: Send + Sync {
    /// Decide whether `url` needs re-fetching, given the validators the
    /// remote currently advertises.
    ///
    /// Evaluating a known record bumps its `last_checked_at` and
    /// `check_count` regardless of the verdict.
    async fn check_for_updates(
        &self,
        url: &str,
        etag: Option<&str>,
        last_modified: Option<&str>,
    ) -> UpdateCheck;

    /// Record a completed fetch.
    ///
    /// Re-registering a known url updates it in place (new validators win,
    /// prior ones are kept when not supplied) and bumps `delta_downloads`.
    /// The quota is recomputed before returning.
    async fn register_download(
        &self,
        url: &str,
        local_path: &str,
        size_bytes: u64,
        metadata: DownloadMetadata,
    ) -> CacheResult<DownloadRecord>;

    /// Look up the record tracked for a url.
    async fn get_record(&self, url: &str) -> Option<DownloadRecord>;

    /// Find a `Current` record with this content hash, if any.
    ///
    /// Lets a caller skip storing bytes already present under a different
    /// url. Stale, expired and deleted records are never offered.
    async fn find_duplicate(&self, content_hash: &str) -> Option<DownloadRecord>;

    /// Checkpoint an interrupted transfer, overwriting any previous
    /// checkpoint for the same `download_id`.
    async fn save_resume_state(
        &self,
        download_id: &str,
        url: &str,
        bytes_downloaded: u64,
        total_bytes: u64,
    ) -> ResumeState;

    /// Fetch the checkpoint for a transfer, if one is outstanding.
    async fn get_resume_state(&self, download_id: &str) -> Option<ResumeState>;

    /// Drop a checkpoint after successful completion.
    ///
    /// Returns whether a checkpoint existed.
    async fn clear_resume_state(&self, download_id: &str) -> bool;

    /// Every outstanding checkpoint, for recovery sweeps after a restart.
    async fn get_pending_resumes(&self) -> Vec<ResumeState>;

    /// Transition `Current` records not checked within `max_age_days` to
    /// `Stale`. Returns how many transitioned.
    async fn mark_stale(&self, max_age_days: i64) -> u64;

    /// Register a cleanup policy. Returns the stored policy.
    async fn add_cleanup_policy(&self, policy: CleanupPolicy) -> CleanupPolicy;

    /// Remove a policy. Returns whether it existed.
    async fn remove_cleanup_policy(&self, policy_id: Uuid) -> bool;

    /// All registered policies in registration order.
    async fn get_cleanup_policies(&self) -> Vec<CleanupPolicy>;

    /// Execute one policy against the record table.
    ///
    /// Returns `None` if the policy is unknown or disabled. Otherwise the
    /// result is appended to history and the quota recomputed.
    async fn execute_cleanup(&self, policy_id: Uuid) -> Option<CleanupResult>;

    /// Execute every enabled policy in registration order. The quota is
    /// recomputed after each policy, matching `execute_cleanup`.
    async fn run_all_cleanups(&self) -> Vec<CleanupResult>;

    /// The append-only history of policy executions.
    async fn get_cleanup_results(&self) -> Vec<CleanupResult>;

    /// Current quota aggregate. O(1): usage is recomputed on mutation,
    /// never lazily on read.
    async fn get_quota(&self) -> StorageQuota;

    /// Adjust the storage budget.
    async fn set_max_quota(&self, max_bytes: u64);

    /// Whether usage has reached or passed the budget.
    async fn is_quota_exceeded(&self) -> bool;

    /// Whether usage has reached or passed the warning fraction.
    async fn is_quota_warning(&self) -> bool;
}
