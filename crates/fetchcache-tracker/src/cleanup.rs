//! Cleanup policy registry and execution.
//!
//! Pure synchronous policy logic over the record repository. The facade
//! owns serialization, history and quota recomputation; this module only
//! decides which records a policy touches and applies the action.
//!
//! # Boundary semantics
//!
//! - Age (cleanup): a record is old enough when `downloaded_at` is at or
//!   before `now - max_age_days` (inclusive), so a zero-age policy run
//!   under the same clock tick as a registration still evicts it.
//! - Age (staleness): strictly older than the cutoff; a record checked
//!   exactly at the boundary stays `Current`.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use fetchcache_core::domain::{CleanupAction, CleanupPolicy, CleanupResult, RecordStatus};
use fetchcache_core::ports::RecordRepository;

/// Registry of cleanup policies, in registration order.
#[derive(Debug, Default)]
pub struct CleanupSet {
    policies: IndexMap<Uuid, CleanupPolicy>,
}

impl CleanupSet {
    /// Create an empty policy set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policies: IndexMap::new(),
        }
    }

    /// Register a policy. Re-adding an id replaces the stored policy in
    /// place without changing its registration order.
    pub fn add(&mut self, policy: CleanupPolicy) -> CleanupPolicy {
        self.policies.insert(policy.id, policy.clone());
        policy
    }

    /// Remove a policy, closing the gap in registration order.
    ///
    /// Returns whether it existed.
    pub fn remove(&mut self, policy_id: Uuid) -> bool {
        self.policies.shift_remove(&policy_id).is_some()
    }

    /// Look up a policy by id.
    #[must_use]
    pub fn get(&self, policy_id: Uuid) -> Option<&CleanupPolicy> {
        self.policies.get(&policy_id)
    }

    /// All policies in registration order.
    #[must_use]
    pub fn all(&self) -> Vec<CleanupPolicy> {
        self.policies.values().cloned().collect()
    }

    /// Enabled policies in registration order.
    #[must_use]
    pub fn enabled(&self) -> Vec<CleanupPolicy> {
        self.policies
            .values()
            .filter(|p| p.enabled)
            .cloned()
            .collect()
    }
}

/// Run one policy over every record not already deleted.
///
/// The caller has already checked that the policy is enabled. Returns the
/// audit record; the caller appends it to history and recomputes quota.
pub(crate) fn execute(
    policy: &CleanupPolicy,
    repo: &mut dyn RecordRepository,
    now: DateTime<Utc>,
) -> CleanupResult {
    let cutoff = age_cutoff(now, policy.max_age_days);

    let mut files_scanned = 0;
    let mut files_affected = 0;
    let mut bytes_freed = 0;

    for mut record in repo.scan() {
        if record.status == RecordStatus::Deleted {
            continue;
        }
        files_scanned += 1;

        if !policy.matches_path(&record.local_path) {
            continue;
        }
        let old_enough = cutoff.is_some_and(|c| record.downloaded_at <= c);
        let too_large = record.size_bytes > policy.max_size_bytes;
        if !old_enough && !too_large {
            continue;
        }

        match policy.action {
            CleanupAction::Delete => record.status = RecordStatus::Deleted,
            CleanupAction::Archive => record.status = RecordStatus::Expired,
            CleanupAction::Compress => record.compressed = true,
        }
        files_affected += 1;
        bytes_freed += record.size_bytes;
        repo.upsert(record);
    }

    CleanupResult {
        policy_id: policy.id,
        files_scanned,
        files_affected,
        bytes_freed,
        executed_at: now,
    }
}

/// Transition `Current` records whose last check is strictly older than
/// the cutoff to `Stale`. Returns how many transitioned.
pub(crate) fn mark_stale(
    repo: &mut dyn RecordRepository,
    now: DateTime<Utc>,
    max_age_days: i64,
) -> u64 {
    let Some(cutoff) = age_cutoff(now, max_age_days) else {
        return 0;
    };

    let mut count = 0;
    for mut record in repo.scan() {
        if record.status == RecordStatus::Current && record.last_checked_at < cutoff {
            record.status = RecordStatus::Stale;
            repo.upsert(record);
            count += 1;
        }
    }
    count
}

/// `now - max_age_days`, or `None` when the window is unrepresentable.
fn age_cutoff(now: DateTime<Utc>, max_age_days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(max_age_days).and_then(|age| now.checked_sub_signed(age))
}
