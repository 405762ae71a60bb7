//! Quota recomputation.
//!
//! Usage is always derived from a full scan of the record table rather
//! than patched incrementally, so it cannot drift when records are
//! mutated through different code paths. The facade triggers this after
//! every registration and every cleanup execution.

use fetchcache_core::domain::StorageQuota;
use fetchcache_core::ports::RecordRepository;

/// Recompute `used_bytes` and `file_count` from the record table.
///
/// Counts records with status `Current` or `Stale`; expired and deleted
/// records are free from the active-quota point of view.
pub(crate) fn recompute(quota: &mut StorageQuota, repo: &dyn RecordRepository) {
    let (used_bytes, file_count) = repo
        .scan()
        .iter()
        .filter(|r| r.status.counts_toward_quota())
        .fold((0, 0), |(bytes, count), r| {
            (bytes + r.size_bytes, count + 1)
        });

    quota.used_bytes = used_bytes;
    quota.file_count = file_count;
}
