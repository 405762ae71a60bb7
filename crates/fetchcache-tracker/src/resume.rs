//! Resume checkpoint tracking.
//!
//! Pure synchronous state machine for interrupted-transfer checkpoints,
//! keyed by download id. The caller (the tracker facade) is responsible
//! for synchronization, as with the record store.

use fetchcache_core::domain::ResumeState;
use indexmap::IndexMap;

/// Table of outstanding transfer checkpoints.
#[derive(Debug, Default)]
pub struct ResumeTracker {
    checkpoints: IndexMap<String, ResumeState>,
}

impl ResumeTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            checkpoints: IndexMap::new(),
        }
    }

    /// Store a checkpoint, overwriting any previous one for the same
    /// download id. Retry attempts re-checkpoint through this path.
    pub fn save(&mut self, state: ResumeState) {
        self.checkpoints.insert(state.download_id.clone(), state);
    }

    /// Fetch the checkpoint for a download, if any.
    #[must_use]
    pub fn get(&self, download_id: &str) -> Option<ResumeState> {
        self.checkpoints.get(download_id).cloned()
    }

    /// Drop a checkpoint after the transfer completes.
    ///
    /// Returns whether a checkpoint existed.
    pub fn clear(&mut self, download_id: &str) -> bool {
        self.checkpoints.shift_remove(download_id).is_some()
    }

    /// Every outstanding checkpoint, in save order.
    ///
    /// Intended for recovery sweeps after a process restart, when the
    /// external persistence layer has restored this table.
    #[must_use]
    pub fn pending(&self) -> Vec<ResumeState> {
        self.checkpoints.values().cloned().collect()
    }

    /// Number of outstanding checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Whether there are no outstanding checkpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn checkpoint(id: &str, bytes: u64) -> ResumeState {
        ResumeState::new(id, format!("https://example.com/{id}"), bytes, 10_000, Utc::now())
    }

    #[test]
    fn test_save_and_get() {
        let mut tracker = ResumeTracker::new();
        tracker.save(checkpoint("dl-1", 500));

        let state = tracker.get("dl-1").unwrap();
        assert_eq!(state.bytes_downloaded, 500);
        assert_eq!(state.range_header(), "bytes=500-");
        assert!(tracker.get("dl-2").is_none());
    }

    #[test]
    fn test_save_overwrites_on_retry() {
        let mut tracker = ResumeTracker::new();
        tracker.save(checkpoint("dl-1", 500));
        tracker.save(checkpoint("dl-1", 2500));

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get("dl-1").unwrap().bytes_downloaded, 2500);
    }

    #[test]
    fn test_clear_reports_existence() {
        let mut tracker = ResumeTracker::new();
        tracker.save(checkpoint("dl-1", 500));

        assert!(tracker.clear("dl-1"));
        assert!(!tracker.clear("dl-1"));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_pending_enumerates_in_save_order() {
        let mut tracker = ResumeTracker::new();
        tracker.save(checkpoint("dl-1", 100));
        tracker.save(checkpoint("dl-2", 200));
        tracker.save(checkpoint("dl-3", 300));
        tracker.clear("dl-2");

        let ids: Vec<_> = tracker
            .pending()
            .into_iter()
            .map(|s| s.download_id)
            .collect();
        assert_eq!(ids, vec!["dl-1", "dl-3"]);
    }
}
