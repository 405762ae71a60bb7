//! Tracked-resource records.
//!
//! One `DownloadRecord` exists per distinct source url. Records are never
//! physically removed from the store; eviction flips `status` so that
//! audit history and dedup exclusions survive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a tracked resource.
///
/// Legal transitions are `Current -> Stale -> {Current, Expired, Deleted}`
/// and `Current -> Deleted` directly (cleanup may skip staleness).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Locally cached copy is trusted.
    Current,
    /// Freshness has not been verified recently; still quota-counted.
    Stale,
    /// Archived out of active storage (bytes may live in cold storage).
    Expired,
    /// Logically destroyed. Terminal.
    Deleted,
}

impl RecordStatus {
    /// Whether records in this status count toward storage quota usage.
    ///
    /// `Expired` is modeled as freed from active quota even though the
    /// bytes may still exist in cold storage.
    #[must_use]
    pub const fn counts_toward_quota(self) -> bool {
        matches!(self, Self::Current | Self::Stale)
    }

    /// Get the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Stale => "stale",
            Self::Expired => "expired",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tracked remote resource that has been fetched into local storage.
///
/// `source_url` is the unique key. `check_count` and `delta_downloads` are
/// telemetry counters: the former bumps on every freshness evaluation
/// regardless of verdict, the latter only when an already-known url is
/// re-registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRecord {
    /// Opaque stable identifier.
    pub id: Uuid,
    /// The remote locator this record tracks (unique key).
    pub source_url: String,
    /// Where the caller stored the fetched bytes. Opaque to the engine.
    pub local_path: String,
    /// HTTP ETag validator from the last fetch, if the server sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// HTTP Last-Modified validator from the last fetch, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Content hash for duplicate detection. Caller-supplied, or a
    /// synthesized placeholder when the caller omitted one.
    pub content_hash: String,
    /// Size of the stored copy in bytes.
    pub size_bytes: u64,
    /// When the bytes were last fetched.
    pub downloaded_at: DateTime<Utc>,
    /// When freshness was last evaluated.
    pub last_checked_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// Number of freshness evaluations performed against this record.
    pub check_count: u64,
    /// Number of re-fetches after the first download.
    pub delta_downloads: u64,
    /// Set by a `Compress` cleanup action; orthogonal to `status`.
    pub compressed: bool,
}

impl DownloadRecord {
    /// Create a record for a first-time registration.
    ///
    /// Starts `Current` with `check_count = 1` (registration counts as the
    /// first evaluation) and `delta_downloads = 0`.
    pub fn new(
        source_url: impl Into<String>,
        local_path: impl Into<String>,
        size_bytes: u64,
        content_hash: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_url: source_url.into(),
            local_path: local_path.into(),
            etag: None,
            last_modified: None,
            content_hash: content_hash.into(),
            size_bytes,
            downloaded_at: now,
            last_checked_at: now,
            status: RecordStatus::Current,
            check_count: 1,
            delta_downloads: 0,
            compressed: false,
        }
    }

    /// Whether this record is offered as a dedup source.
    ///
    /// Only `Current` records qualify: stale content hasn't been verified
    /// recently, and evicted content must never be resurrected as
    /// "already present".
    #[must_use]
    pub const fn dedup_eligible(&self) -> bool {
        matches!(self.status, RecordStatus::Current)
    }
}
