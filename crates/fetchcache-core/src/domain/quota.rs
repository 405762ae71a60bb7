//! Aggregate storage accounting.

use serde::{Deserialize, Serialize};

/// Process-wide storage usage against a configured budget.
///
/// `used_bytes` and `file_count` are derived: the engine recomputes them
/// from a full record scan after every mutation rather than patching them
/// incrementally, so they cannot drift from the record table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageQuota {
    /// The storage budget in bytes.
    pub max_bytes: u64,
    /// Sum of `size_bytes` over current and stale records.
    pub used_bytes: u64,
    /// Count of current and stale records.
    pub file_count: u64,
    /// Fraction of `max_bytes` at which `is_warning` trips (e.g. 0.8).
    pub warning_threshold: f64,
}

impl StorageQuota {
    /// Create a quota with zero usage.
    #[must_use]
    pub const fn new(max_bytes: u64, warning_threshold: f64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            file_count: 0,
            warning_threshold,
        }
    }

    /// Usage has reached or passed the budget.
    #[must_use]
    pub const fn is_exceeded(&self) -> bool {
        self.used_bytes >= self.max_bytes
    }

    /// Usage has reached or passed the warning fraction of the budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_warning(&self) -> bool {
        let threshold = (self.max_bytes as f64) * self.warning_threshold;
        (self.used_bytes as f64) >= threshold
    }
}
