//! Fetch-cache tracker implementation.
//!
//! This module provides the concrete implementation of `FetchCachePort`.
//!
//! # Concurrency Model
//!
//! Every piece of mutable state (record repository, resume checkpoints,
//! cleanup policies, execution history, quota aggregate) lives in one
//! `Inner` behind a single `RwLock`. Mutations hold the write lock for
//! their whole read-compute-write cycle, so a registration can never
//! interleave with a cleanup scan and no reader observes a record
//! mid-mutation. Reads clone under the read lock.
//!
//! No operation blocks on external I/O; everything is bounded by the size
//! of the record table.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fetchcache_core::domain::{
    CacheResult, CleanupPolicy, CleanupResult, DownloadMetadata, DownloadRecord, RecordStatus,
    ResumeState, StorageQuota, UpdateCheck, UpdateReason,
};
use fetchcache_core::ports::{
    Clock, ContentHasher, FetchCachePort, RecordRepository, Sha256Hasher, SystemClock,
    TrackerConfig,
};

use crate::cleanup::{self, CleanupSet};
use crate::quota;
use crate::resume::ResumeTracker;
use crate::store::InMemoryRecordStore;

/// Dependencies for creating a tracker.
///
/// This struct bundles the ports and configuration needed to construct a
/// `FetchCacheTracker`.
pub struct TrackerDeps<C, H>
where
    C: Clock + 'static,
    H: ContentHasher + 'static,
{
    /// Source of wall-clock time.
    pub clock: Arc<C>,
    /// Fallback hasher for registrations without a content hash.
    pub hasher: Arc<H>,
    /// Engine configuration.
    pub config: TrackerConfig,
}

/// Build a tracker from its dependencies.
///
/// Returns an implementation of `FetchCachePort` that can be stored as
/// `Arc<dyn FetchCachePort>` by callers.
pub fn build_tracker<C, H>(deps: TrackerDeps<C, H>) -> FetchCacheTracker
where
    C: Clock + 'static,
    H: ContentHasher + 'static,
{
    FetchCacheTracker::new(deps.clock, deps.hasher, deps.config)
}

/// All mutable engine state. The record repository is the single source
/// of truth; quota totals are derived from it and everything else is
/// loosely related bookkeeping.
struct Inner {
    records: Box<dyn RecordRepository>,
    resumes: ResumeTracker,
    policies: CleanupSet,
    history: Vec<CleanupResult>,
    quota: StorageQuota,
}

/// Concrete implementation of the fetch-cache engine.
///
/// This struct is public but callers should typically use
/// `Arc<dyn FetchCachePort>` instead of depending on this type directly.
pub struct FetchCacheTracker {
    clock: Arc<dyn Clock>,
    hasher: Arc<dyn ContentHasher>,
    inner: RwLock<Inner>,
}

impl FetchCacheTracker {
    /// Create a tracker backed by the in-memory record store.
    fn new<C, H>(clock: Arc<C>, hasher: Arc<H>, config: TrackerConfig) -> Self
    where
        C: Clock + 'static,
        H: ContentHasher + 'static,
    {
        Self {
            clock,
            hasher,
            inner: RwLock::new(Inner {
                records: Box::new(InMemoryRecordStore::new()),
                resumes: ResumeTracker::new(),
                policies: CleanupSet::new(),
                history: Vec::new(),
                quota: StorageQuota::new(config.max_quota_bytes, config.warning_threshold),
            }),
        }
    }

    /// Substitute the record repository (e.g. a durable write-through
    /// store provided by the embedding layer). Recomputes the quota
    /// against whatever the new repository already holds.
    #[must_use]
    pub fn with_repository(self, records: Box<dyn RecordRepository>) -> Self {
        let Self {
            clock,
            hasher,
            inner,
        } = self;
        let mut inner = inner.into_inner();
        inner.records = records;
        quota::recompute(&mut inner.quota, inner.records.as_ref());
        Self {
            clock,
            hasher,
            inner: RwLock::new(inner),
        }
    }
}

impl Default for FetchCacheTracker {
    fn default() -> Self {
        build_tracker(TrackerDeps {
            clock: Arc::new(SystemClock::new()),
            hasher: Arc::new(Sha256Hasher::new()),
            config: TrackerConfig::default(),
        })
    }
}

/// Compare stored validators against what the remote advertises.
///
/// A validator participates only when both sides supply one. ETag and
/// Last-Modified are checked independently: matching etags do not
/// suppress a Last-Modified disagreement.
fn compare_validators(
    record: &DownloadRecord,
    etag: Option<&str>,
    last_modified: Option<&str>,
) -> UpdateCheck {
    if let (Some(stored), Some(remote)) = (record.etag.as_deref(), etag) {
        if stored != remote {
            return UpdateCheck::changed(UpdateReason::EtagChanged);
        }
    }
    if let (Some(stored), Some(remote)) = (record.last_modified.as_deref(), last_modified) {
        if stored != remote {
            return UpdateCheck::changed(UpdateReason::LastModifiedChanged);
        }
    }
    UpdateCheck::unchanged()
}

#[async_trait]
impl FetchCachePort for FetchCacheTracker {
    async fn check_for_updates(
        &self,
        url: &str,
        etag: Option<&str>,
        last_modified: Option<&str>,
    ) -> UpdateCheck {
        let mut guard = self.inner.write().await;

        let Some(mut record) = guard.records.get(url) else {
            tracing::debug!(target: "fetchcache.tracker", url, "Freshness check: unknown url");
            return UpdateCheck::new_resource();
        };

        // Telemetry effect of evaluation, independent of the verdict.
        record.last_checked_at = self.clock.now();
        record.check_count += 1;

        let verdict = compare_validators(&record, etag, last_modified);
        guard.records.upsert(record);

        tracing::debug!(
            target: "fetchcache.tracker",
            url,
            needs_download = verdict.needs_download,
            reason = %verdict.reason,
            "Freshness check"
        );
        verdict
    }

    async fn register_download(
        &self,
        url: &str,
        local_path: &str,
        size_bytes: u64,
        metadata: DownloadMetadata,
    ) -> CacheResult<DownloadRecord> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let now = self.clock.now();

        let record = if let Some(mut existing) = inner.records.get(url) {
            // Re-registration: new values win, prior validators are kept
            // when the fetch layer didn't supply fresh ones.
            existing.local_path = local_path.to_string();
            existing.size_bytes = size_bytes;
            if let Some(etag) = metadata.etag {
                existing.etag = Some(etag);
            }
            if let Some(last_modified) = metadata.last_modified {
                existing.last_modified = Some(last_modified);
            }
            if let Some(content_hash) = metadata.content_hash {
                existing.content_hash = content_hash;
            }
            existing.downloaded_at = now;
            existing.last_checked_at = now;
            existing.status = RecordStatus::Current;
            // Fresh bytes are uncompressed regardless of prior cleanup.
            existing.compressed = false;
            existing.delta_downloads += 1;
            inner.records.upsert(existing.clone());
            existing
        } else {
            let content_hash = metadata
                .content_hash
                .unwrap_or_else(|| self.hasher.synthesize(url, now));
            let mut record = DownloadRecord::new(url, local_path, size_bytes, content_hash, now);
            record.etag = metadata.etag;
            record.last_modified = metadata.last_modified;
            inner.records.insert(record.clone())?;
            record
        };

        quota::recompute(&mut inner.quota, inner.records.as_ref());

        tracing::info!(
            target: "fetchcache.tracker",
            url,
            size_bytes,
            delta_downloads = record.delta_downloads,
            used_bytes = inner.quota.used_bytes,
            "Download registered"
        );
        Ok(record)
    }

    async fn get_record(&self, url: &str) -> Option<DownloadRecord> {
        self.inner.read().await.records.get(url)
    }

    async fn find_duplicate(&self, content_hash: &str) -> Option<DownloadRecord> {
        let guard = self.inner.read().await;
        guard
            .records
            .scan()
            .into_iter()
            .find(|r| r.dedup_eligible() && r.content_hash == content_hash)
    }

    async fn save_resume_state(
        &self,
        download_id: &str,
        url: &str,
        bytes_downloaded: u64,
        total_bytes: u64,
    ) -> ResumeState {
        let state = ResumeState::new(
            download_id,
            url,
            bytes_downloaded,
            total_bytes,
            self.clock.now(),
        );
        self.inner.write().await.resumes.save(state.clone());

        tracing::debug!(
            target: "fetchcache.tracker",
            download_id,
            bytes_downloaded,
            total_bytes,
            "Resume checkpoint saved"
        );
        state
    }

    async fn get_resume_state(&self, download_id: &str) -> Option<ResumeState> {
        self.inner.read().await.resumes.get(download_id)
    }

    async fn clear_resume_state(&self, download_id: &str) -> bool {
        let existed = self.inner.write().await.resumes.clear(download_id);
        if existed {
            tracing::debug!(target: "fetchcache.tracker", download_id, "Resume checkpoint cleared");
        }
        existed
    }

    async fn get_pending_resumes(&self) -> Vec<ResumeState> {
        self.inner.read().await.resumes.pending()
    }

    async fn mark_stale(&self, max_age_days: i64) -> u64 {
        let mut guard = self.inner.write().await;
        let now = self.clock.now();
        let count = cleanup::mark_stale(guard.records.as_mut(), now, max_age_days);

        tracing::info!(target: "fetchcache.tracker", max_age_days, count, "Marked records stale");
        count
    }

    async fn add_cleanup_policy(&self, policy: CleanupPolicy) -> CleanupPolicy {
        tracing::info!(
            target: "fetchcache.tracker",
            policy_id = %policy.id,
            name = %policy.name,
            action = %policy.action,
            enabled = policy.enabled,
            "Cleanup policy added"
        );
        self.inner.write().await.policies.add(policy)
    }

    async fn remove_cleanup_policy(&self, policy_id: Uuid) -> bool {
        let removed = self.inner.write().await.policies.remove(policy_id);
        if removed {
            tracing::info!(target: "fetchcache.tracker", policy_id = %policy_id, "Cleanup policy removed");
        }
        removed
    }

    async fn get_cleanup_policies(&self) -> Vec<CleanupPolicy> {
        self.inner.read().await.policies.all()
    }

    async fn execute_cleanup(&self, policy_id: Uuid) -> Option<CleanupResult> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let policy = inner.policies.get(policy_id)?.clone();
        if !policy.enabled {
            tracing::debug!(target: "fetchcache.tracker", policy_id = %policy_id, "Skipping disabled policy");
            return None;
        }

        let now = self.clock.now();
        let result = cleanup::execute(&policy, inner.records.as_mut(), now);
        quota::recompute(&mut inner.quota, inner.records.as_ref());
        inner.history.push(result.clone());

        tracing::info!(
            target: "fetchcache.tracker",
            policy = %policy.name,
            files_scanned = result.files_scanned,
            files_affected = result.files_affected,
            bytes_freed = result.bytes_freed,
            "Cleanup executed"
        );
        Some(result)
    }

    async fn run_all_cleanups(&self) -> Vec<CleanupResult> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let now = self.clock.now();

        let mut results = Vec::new();
        for policy in inner.policies.enabled() {
            let result = cleanup::execute(&policy, inner.records.as_mut(), now);
            // Per-policy recompute, matching execute_cleanup.
            quota::recompute(&mut inner.quota, inner.records.as_ref());
            inner.history.push(result.clone());
            results.push(result);
        }

        tracing::info!(
            target: "fetchcache.tracker",
            policies_run = results.len(),
            "Ran all enabled cleanup policies"
        );
        results
    }

    async fn get_cleanup_results(&self) -> Vec<CleanupResult> {
        self.inner.read().await.history.clone()
    }

    async fn get_quota(&self) -> StorageQuota {
        self.inner.read().await.quota.clone()
    }

    async fn set_max_quota(&self, max_bytes: u64) {
        self.inner.write().await.quota.max_bytes = max_bytes;
        tracing::info!(target: "fetchcache.tracker", max_bytes, "Quota budget adjusted");
    }

    async fn is_quota_exceeded(&self) -> bool {
        self.inner.read().await.quota.is_exceeded()
    }

    async fn is_quota_warning(&self) -> bool {
        self.inner.read().await.quota.is_warning()
    }
}
