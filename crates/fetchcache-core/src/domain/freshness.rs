//! Conditional-fetch verdicts and registration metadata.
//!
//! Mirrors conditional-GET semantics: validators are compared only when
//! both sides supply one, and ETag and Last-Modified are checked
//! independently rather than one short-circuiting the other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a freshness check reached its verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateReason {
    /// No record exists for this url yet.
    NewResource,
    /// Both sides supplied an ETag and they differ.
    EtagChanged,
    /// Both sides supplied a Last-Modified and they differ.
    LastModifiedChanged,
    /// No validator disagreement; the cached copy can be trusted.
    Unchanged,
}

impl UpdateReason {
    /// Get the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewResource => "new_resource",
            Self::EtagChanged => "etag_changed",
            Self::LastModifiedChanged => "last_modified_changed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for UpdateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict returned by a freshness check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCheck {
    /// Whether the caller should re-fetch the resource.
    pub needs_download: bool,
    /// Why.
    pub reason: UpdateReason,
}

impl UpdateCheck {
    /// The url has never been registered.
    #[must_use]
    pub const fn new_resource() -> Self {
        Self {
            needs_download: true,
            reason: UpdateReason::NewResource,
        }
    }

    /// A validator changed; a re-fetch is needed.
    #[must_use]
    pub const fn changed(reason: UpdateReason) -> Self {
        Self {
            needs_download: true,
            reason,
        }
    }

    /// The cached copy can be trusted.
    #[must_use]
    pub const fn unchanged() -> Self {
        Self {
            needs_download: false,
            reason: UpdateReason::Unchanged,
        }
    }
}

/// Optional metadata supplied alongside a registration.
///
/// Validators and hash come from whatever fetch mechanism the caller used;
/// the engine never computes a hash from bytes itself. Callers that need
/// real dedup MUST supply `content_hash` — the synthesized fallback only
/// guarantees uniqueness, not collision-freedom across different content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadMetadata {
    /// ETag returned by the server, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Last-Modified returned by the server, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Hash of the fetched bytes, if the caller computed one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl DownloadMetadata {
    /// Metadata with no validators and no hash.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            etag: None,
            last_modified: None,
            content_hash: None,
        }
    }

    /// Set the ETag validator.
    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Set the Last-Modified validator.
    #[must_use]
    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    /// Set the content hash.
    #[must_use]
    pub fn with_content_hash(mut self, content_hash: impl Into<String>) -> Self {
        self.content_hash = Some(content_hash.into());
        self
    }
}
