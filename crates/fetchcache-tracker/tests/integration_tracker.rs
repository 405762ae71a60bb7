//! End-to-end exercises of the tracker through its public port.

use std::sync::Arc;

use chrono::{Duration, Utc};
use fetchcache_tracker::{
    build_tracker, CleanupAction, CleanupPolicy, Clock, DownloadMetadata, FetchCachePort,
    FetchCacheTracker, ManualClock, RecordStatus, Sha256Hasher, TrackerConfig, TrackerDeps,
    UpdateReason,
};

fn frozen_tracker(clock: Arc<ManualClock>) -> FetchCacheTracker {
    build_tracker(TrackerDeps {
        clock,
        hasher: Arc::new(Sha256Hasher::new()),
        config: TrackerConfig::new(10 * 1024 * 1024),
    })
}

async fn register(tracker: &FetchCacheTracker, url: &str, path: &str, size: u64) {
    tracker
        .register_download(url, path, size, DownloadMetadata::none())
        .await
        .unwrap();
}

#[tokio::test]
async fn register_then_recheck_is_a_cache_hit() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(Arc::clone(&clock));

    let first = tracker
        .check_for_updates("https://docs.example.com/guide.pdf", Some("\"abc\""), None)
        .await;
    assert!(first.needs_download);
    assert_eq!(first.reason, UpdateReason::NewResource);

    tracker
        .register_download(
            "https://docs.example.com/guide.pdf",
            "/cache/guide.pdf",
            2048,
            DownloadMetadata::none().with_etag("\"abc\""),
        )
        .await
        .unwrap();

    // Same validator on every later check: stays a hit, counters advance.
    for expected_checks in 2..=4 {
        clock.advance(Duration::minutes(5));
        let check = tracker
            .check_for_updates("https://docs.example.com/guide.pdf", Some("\"abc\""), None)
            .await;
        assert!(!check.needs_download);
        assert_eq!(check.reason, UpdateReason::Unchanged);

        let record = tracker
            .get_record("https://docs.example.com/guide.pdf")
            .await
            .unwrap();
        assert_eq!(record.check_count, expected_checks);
        assert_eq!(record.last_checked_at, clock.now());
    }
}

#[tokio::test]
async fn reregistration_updates_size_and_delta() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(Arc::clone(&clock));

    register(&tracker, "https://docs.example.com/a", "/cache/a", 1000).await;
    let quota = tracker.get_quota().await;
    assert_eq!(quota.used_bytes, 1000);
    assert_eq!(quota.file_count, 1);

    clock.advance(Duration::days(1));
    let record = tracker
        .register_download(
            "https://docs.example.com/a",
            "/cache/a",
            1500,
            DownloadMetadata::none(),
        )
        .await
        .unwrap();

    assert_eq!(record.size_bytes, 1500);
    assert_eq!(record.delta_downloads, 1);
    assert_eq!(record.downloaded_at, clock.now());

    // Quota reflects the replacement, not the sum.
    let quota = tracker.get_quota().await;
    assert_eq!(quota.used_bytes, 1500);
    assert_eq!(quota.file_count, 1);
}

#[tokio::test]
async fn repeated_reregistration_counts_deltas() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(Arc::clone(&clock));

    for _ in 0..5 {
        register(&tracker, "https://docs.example.com/a", "/cache/a", 100).await;
        clock.advance(Duration::hours(1));
    }

    let record = tracker
        .get_record("https://docs.example.com/a")
        .await
        .unwrap();
    assert_eq!(record.delta_downloads, 4);
}

#[tokio::test]
async fn duplicate_content_found_across_urls() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(clock);

    tracker
        .register_download(
            "https://docs.example.com/a",
            "/cache/a",
            100,
            DownloadMetadata::none().with_content_hash("deadbeef"),
        )
        .await
        .unwrap();

    // Before fetching url b, the pipeline asks whether the bytes already exist.
    let hit = tracker.find_duplicate("deadbeef").await.unwrap();
    assert_eq!(hit.source_url, "https://docs.example.com/a");

    tracker
        .register_download(
            "https://docs.example.com/b",
            "/cache/a",
            100,
            DownloadMetadata::none().with_content_hash("deadbeef"),
        )
        .await
        .unwrap();

    // Both records exist independently; dedup returns the first in scan order.
    let hit = tracker.find_duplicate("deadbeef").await.unwrap();
    assert_eq!(hit.source_url, "https://docs.example.com/a");
    assert!(tracker.find_duplicate("cafebabe").await.is_none());
}

#[tokio::test]
async fn evicted_records_leave_the_dedup_index() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(clock);

    tracker
        .register_download(
            "https://docs.example.com/a",
            "/cache/a",
            100,
            DownloadMetadata::none().with_content_hash("deadbeef"),
        )
        .await
        .unwrap();
    assert!(tracker.find_duplicate("deadbeef").await.is_some());

    let policy = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "sweep",
            0,
            u64::MAX,
            "*",
            CleanupAction::Delete,
        ))
        .await;
    tracker.execute_cleanup(policy.id).await.unwrap();

    // The deleted record's bytes are gone from disk; its hash must not
    // satisfy future dedup probes.
    assert!(tracker.find_duplicate("deadbeef").await.is_none());
    let record = tracker
        .get_record("https://docs.example.com/a")
        .await
        .unwrap();
    assert_eq!(record.status, RecordStatus::Deleted);
}

#[tokio::test]
async fn zero_age_delete_policy_evicts_fresh_records() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(Arc::clone(&clock));

    register(&tracker, "https://docs.example.com/a", "/cache/a", 4000).await;
    register(&tracker, "https://docs.example.com/b", "/cache/b", 6000).await;
    assert_eq!(tracker.get_quota().await.used_bytes, 10_000);

    let policy = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "evict everything",
            0,
            u64::MAX,
            "*",
            CleanupAction::Delete,
        ))
        .await;

    // Same clock tick as the registrations: still affected.
    let result = tracker.execute_cleanup(policy.id).await.unwrap();
    assert_eq!(result.files_scanned, 2);
    assert_eq!(result.files_affected, 2);
    assert_eq!(result.bytes_freed, 10_000);
    assert_eq!(result.executed_at, clock.now());

    let quota = tracker.get_quota().await;
    assert_eq!(quota.used_bytes, 0);
    assert_eq!(quota.file_count, 0);
}

#[tokio::test]
async fn age_policy_only_evicts_old_records() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(Arc::clone(&clock));

    register(&tracker, "https://docs.example.com/old", "/cache/old", 100).await;
    clock.advance(Duration::days(30));
    register(&tracker, "https://docs.example.com/new", "/cache/new", 100).await;

    let policy = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "weekly",
            7,
            u64::MAX,
            "*",
            CleanupAction::Delete,
        ))
        .await;
    let result = tracker.execute_cleanup(policy.id).await.unwrap();

    assert_eq!(result.files_affected, 1);
    assert_eq!(
        tracker
            .get_record("https://docs.example.com/old")
            .await
            .unwrap()
            .status,
        RecordStatus::Deleted
    );
    assert_eq!(
        tracker
            .get_record("https://docs.example.com/new")
            .await
            .unwrap()
            .status,
        RecordStatus::Current
    );
}

#[tokio::test]
async fn cleanup_history_accumulates() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(clock);

    register(&tracker, "https://docs.example.com/a", "/cache/a", 100).await;
    let policy = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "sweep",
            0,
            u64::MAX,
            "*",
            CleanupAction::Delete,
        ))
        .await;

    tracker.execute_cleanup(policy.id).await.unwrap();
    tracker.execute_cleanup(policy.id).await.unwrap();

    let history = tracker.get_cleanup_results().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].files_affected, 1);
    // Second run scans nothing: the record is already deleted.
    assert_eq!(history[1].files_scanned, 0);
    assert_eq!(history[1].files_affected, 0);
}

#[tokio::test]
async fn run_all_applies_policies_in_registration_order() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(clock);

    register(&tracker, "https://docs.example.com/a", "/cache/a", 100).await;

    let archive = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "archive first",
            0,
            u64::MAX,
            "*",
            CleanupAction::Archive,
        ))
        .await;
    let delete = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "delete second",
            0,
            u64::MAX,
            "*",
            CleanupAction::Delete,
        ))
        .await;

    let results = tracker.run_all_cleanups().await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].policy_id, archive.id);
    assert_eq!(results[1].policy_id, delete.id);

    // The archive ran first, then the delete saw the expired record.
    assert_eq!(results[0].files_affected, 1);
    assert_eq!(results[1].files_affected, 1);
    assert_eq!(
        tracker
            .get_record("https://docs.example.com/a")
            .await
            .unwrap()
            .status,
        RecordStatus::Deleted
    );
}

#[tokio::test]
async fn mark_stale_then_refresh_restores_current() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(Arc::clone(&clock));

    register(&tracker, "https://docs.example.com/a", "/cache/a", 100).await;
    clock.advance(Duration::days(10));

    assert_eq!(tracker.mark_stale(7).await, 1);
    let record = tracker
        .get_record("https://docs.example.com/a")
        .await
        .unwrap();
    assert_eq!(record.status, RecordStatus::Stale);

    // Stale records still count against quota.
    assert_eq!(tracker.get_quota().await.used_bytes, 100);

    // Re-download flips it back.
    register(&tracker, "https://docs.example.com/a", "/cache/a", 100).await;
    let record = tracker
        .get_record("https://docs.example.com/a")
        .await
        .unwrap();
    assert_eq!(record.status, RecordStatus::Current);
    assert_eq!(record.delta_downloads, 1);
}

#[tokio::test]
async fn quota_matches_independent_recount() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(clock);

    let sizes = [100_u64, 2000, 300, 4000, 50];
    for (i, size) in sizes.iter().enumerate() {
        register(
            &tracker,
            &format!("https://docs.example.com/{i}"),
            &format!("/cache/{i}"),
            *size,
        )
        .await;
    }

    let delete_big = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "size cap",
            365,
            1000,
            "*",
            CleanupAction::Delete,
        ))
        .await;
    tracker.execute_cleanup(delete_big.id).await.unwrap();

    let quota = tracker.get_quota().await;
    assert_eq!(quota.used_bytes, 100 + 300 + 50);
    assert_eq!(quota.file_count, 3);
}

#[tokio::test]
async fn quota_warning_and_exceeded_thresholds() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = build_tracker(TrackerDeps {
        clock,
        hasher: Arc::new(Sha256Hasher::new()),
        config: TrackerConfig::new(1000).with_warning_threshold(0.8),
    });

    register(&tracker, "https://docs.example.com/a", "/cache/a", 700).await;
    assert!(!tracker.is_quota_warning().await);
    assert!(!tracker.is_quota_exceeded().await);

    register(&tracker, "https://docs.example.com/b", "/cache/b", 100).await;
    assert!(tracker.is_quota_warning().await);
    assert!(!tracker.is_quota_exceeded().await);

    register(&tracker, "https://docs.example.com/c", "/cache/c", 200).await;
    assert!(tracker.is_quota_exceeded().await);
}

#[tokio::test]
async fn compressed_records_still_count_toward_quota() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(clock);

    register(&tracker, "https://docs.example.com/a", "/cache/a", 5000).await;
    let policy = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "squash",
            0,
            u64::MAX,
            "*",
            CleanupAction::Compress,
        ))
        .await;
    let result = tracker.execute_cleanup(policy.id).await.unwrap();
    assert_eq!(result.bytes_freed, 5000);

    let record = tracker
        .get_record("https://docs.example.com/a")
        .await
        .unwrap();
    assert!(record.compressed);
    assert_eq!(record.status, RecordStatus::Current);
    // Tracked size is unchanged until a re-registration reports new bytes.
    assert_eq!(tracker.get_quota().await.used_bytes, 5000);
}

#[tokio::test]
async fn interrupted_transfer_resume_flow() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(Arc::clone(&clock));

    tracker
        .save_resume_state("dl-1", "https://docs.example.com/big.iso", 1024, 4096)
        .await;
    clock.advance(Duration::minutes(1));
    let state = tracker
        .save_resume_state("dl-1", "https://docs.example.com/big.iso", 3072, 4096)
        .await;
    assert_eq!(state.range_header(), "bytes=3072-");
    assert_eq!(state.created_at, clock.now());

    let pending = tracker.get_pending_resumes().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].bytes_downloaded, 3072);

    // Transfer completes: checkpoint cleared, download registered.
    assert!(tracker.clear_resume_state("dl-1").await);
    register(
        &tracker,
        "https://docs.example.com/big.iso",
        "/cache/big.iso",
        4096,
    )
    .await;
    assert!(tracker.get_resume_state("dl-1").await.is_none());
    assert_eq!(tracker.get_quota().await.used_bytes, 4096);
}

#[tokio::test]
async fn removed_policy_no_longer_runs() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = frozen_tracker(clock);

    let policy = tracker
        .add_cleanup_policy(CleanupPolicy::new(
            "sweep",
            0,
            u64::MAX,
            "*",
            CleanupAction::Delete,
        ))
        .await;
    assert_eq!(tracker.get_cleanup_policies().await.len(), 1);

    assert!(tracker.remove_cleanup_policy(policy.id).await);
    assert!(!tracker.remove_cleanup_policy(policy.id).await);
    assert!(tracker.get_cleanup_policies().await.is_empty());
    assert!(tracker.execute_cleanup(policy.id).await.is_none());
    assert!(tracker.run_all_cleanups().await.is_empty());
}
