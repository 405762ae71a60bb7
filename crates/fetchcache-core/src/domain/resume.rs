//! Interrupted-transfer checkpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved byte offset allowing a partial transfer to continue.
///
/// Checkpoints reference their download by `download_id`/`url` only; there
/// is no ownership edge to a `DownloadRecord`. Progress values are taken
/// on faith — the engine does not verify `bytes_downloaded <= total_bytes`,
/// it is a bookkeeping layer for whatever the fetch layer reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeState {
    /// Identifier of the interrupted transfer.
    pub download_id: String,
    /// The url being fetched.
    pub url: String,
    /// Bytes confirmed on disk before the interruption.
    pub bytes_downloaded: u64,
    /// Expected total size, as reported by the fetch layer.
    pub total_bytes: u64,
    /// When this checkpoint was saved.
    pub created_at: DateTime<Utc>,
}

impl ResumeState {
    /// Create a checkpoint.
    pub fn new(
        download_id: impl Into<String>,
        url: impl Into<String>,
        bytes_downloaded: u64,
        total_bytes: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            download_id: download_id.into(),
            url: url.into(),
            bytes_downloaded,
            total_bytes,
            created_at: now,
        }
    }

    /// The HTTP range token to resume from the last confirmed offset.
    ///
    /// Open-ended: `bytes={bytes_downloaded}-`.
    #[must_use]
    pub fn range_header(&self) -> String {
        format!("bytes={}-", self.bytes_downloaded)
    }
}
