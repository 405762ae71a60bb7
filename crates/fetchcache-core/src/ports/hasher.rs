//! Content-hash synthesis port.
//!
//! The engine never reads bytes, so it cannot compute real content hashes;
//! callers supply those. When a caller omits the hash, the engine falls
//! back to synthesizing a placeholder from the url and registration time.
//! That fallback goes through this trait so tests can supply deterministic
//! fixtures.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Synthesizes placeholder content hashes.
///
/// Synthesized hashes guarantee uniqueness per (url, instant), not
/// collision-freedom across different content. Callers that need real
/// dedup must supply a hash of the actual bytes.
pub trait ContentHasher: Send + Sync {
    /// Produce a placeholder hash for a registration without one.
    fn synthesize(&self, url: &str, now: DateTime<Utc>) -> String;
}

/// Production hasher: SHA-256 over `url` and the registration timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Create a new hasher.
    pub const fn new() -> Self {
        Self
    }
}

impl ContentHasher for Sha256Hasher {
    fn synthesize(&self, url: &str, now: DateTime<Utc>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update(now.timestamp_micros().to_le_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_synthesis_is_deterministic() {
        let hasher = Sha256Hasher::new();
        let now = Utc::now();
        assert_eq!(
            hasher.synthesize("https://example.com/a", now),
            hasher.synthesize("https://example.com/a", now)
        );
    }

    #[test]
    fn test_synthesis_varies_by_url_and_time() {
        let hasher = Sha256Hasher::new();
        let now = Utc::now();

        let a = hasher.synthesize("https://example.com/a", now);
        let b = hasher.synthesize("https://example.com/b", now);
        let later = hasher.synthesize("https://example.com/a", now + Duration::seconds(1));

        assert_ne!(a, b);
        assert_ne!(a, later);
    }

    #[test]
    fn test_synthesis_is_hex_sha256() {
        let hasher = Sha256Hasher::new();
        let hash = hasher.synthesize("https://example.com/a", Utc::now());
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
