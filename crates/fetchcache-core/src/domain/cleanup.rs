//! Eviction policies and their audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What to do with records a policy matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupAction {
    /// Logically destroy the record (`status = Deleted`).
    Delete,
    /// Move to cold storage (`status = Expired`, freed from active quota).
    Archive,
    /// Mark for compression in place. Sets the record's `compressed` flag;
    /// status and quota accounting are untouched.
    Compress,
}

impl CleanupAction {
    /// Get the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Archive => "archive",
            Self::Compress => "compress",
        }
    }
}

impl fmt::Display for CleanupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, independently enable-able eviction rule.
///
/// A record is affected when its `local_path` matches `pattern` AND it is
/// either old enough (`downloaded_at` at or before `now - max_age_days`)
/// or larger than `max_size_bytes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupPolicy {
    /// Stable policy identifier.
    pub id: Uuid,
    /// Human-readable name for operator logs.
    pub name: String,
    /// Age cutoff in days. Zero affects everything matching the pattern.
    pub max_age_days: i64,
    /// Size cutoff in bytes; `u64::MAX` means no size bound.
    pub max_size_bytes: u64,
    /// Path filter: `"*"` matches all, anything else is substring
    /// containment against `local_path`.
    pub pattern: String,
    /// What to do with affected records.
    pub action: CleanupAction,
    /// Disabled policies are skipped by execution.
    pub enabled: bool,
}

impl CleanupPolicy {
    /// Create an enabled policy with a fresh id.
    pub fn new(
        name: impl Into<String>,
        max_age_days: i64,
        max_size_bytes: u64,
        pattern: impl Into<String>,
        action: CleanupAction,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            max_age_days,
            max_size_bytes,
            pattern: pattern.into(),
            action,
            enabled: true,
        }
    }

    /// Create a disabled copy of this policy.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether a local path passes this policy's filter.
    #[must_use]
    pub fn matches_path(&self, local_path: &str) -> bool {
        self.pattern == "*" || local_path.contains(&self.pattern)
    }
}

/// Immutable audit record of one policy execution. Append-only history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResult {
    /// The policy that ran.
    pub policy_id: Uuid,
    /// Records scanned (everything not already deleted).
    pub files_scanned: u64,
    /// Records the action was applied to.
    pub files_affected: u64,
    /// Sum of `size_bytes` over affected records. For `Compress` this is
    /// bytes submitted for compression, not quota reclaimed.
    pub bytes_freed: u64,
    /// When the policy ran.
    pub executed_at: DateTime<Utc>,
}
