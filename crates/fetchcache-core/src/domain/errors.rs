//! Engine error types.
//!
//! The engine favors return-value signaling: absent records, unknown
//! policies and missing checkpoints all come back as `None`. The one class
//! of error that is raised is a violation of the engine's own invariants —
//! a programming-contract failure, not a runtime condition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for fetch-cache operations.
///
/// Designed to be serializable across process boundaries without
/// depending on non-serializable types.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CacheError {
    /// An internal invariant was violated (e.g. two records claiming the
    /// same source url). Indicates a concurrency-control failure in the
    /// embedding layer and should fail loudly.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// What was violated.
        message: String,
    },
}

impl CacheError {
    /// Create an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }
}

/// Convenience result type for fetch-cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
