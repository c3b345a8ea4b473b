//! Thread-safe memoized hash cache.
//!
//! # Overview
//!
//! [`HashCache`] maps file paths to their BLAKE3 digests so repeated scans
//! and [`verify`](crate::duplicates::DuplicateDetector::verify) calls skip
//! re-hashing. The map is owned by one
//! [`DuplicateDetector`](crate::duplicates::DuplicateDetector) instance and
//! shared across its hashing workers behind a single mutex; the lock is held
//! only for the lookup or insert, never across file I/O. Entries accumulate
//! for the lifetime of the detector until [`HashCache::clear`] is called.
//!
//! A file that fails to hash is simply absent from the cache; failures are
//! not memoized.

use std::collections::HashMap;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::scanner::Digest;

/// Counters reported by [`HashCache::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of memoized digests
    pub entries: usize,
    /// Approximate byte footprint of the stored digests
    pub digest_bytes: u64,
}

/// Mutex-guarded path-to-digest memo.
#[derive(Debug, Default)]
pub struct HashCache {
    entries: Mutex<HashMap<PathBuf, Digest>>,
}

impl HashCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the memoized digest for `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Digest> {
        self.lock().get(path).copied()
    }

    /// Memoize a digest for `path`, replacing any previous entry.
    pub fn insert(&self, path: PathBuf, digest: Digest) {
        self.lock().insert(path, digest);
    }

    /// Evict every memoized digest.
    pub fn clear(&self) {
        let mut entries = self.lock();
        let evicted = entries.len();
        entries.clear();
        log::debug!("Hash cache cleared ({evicted} entries evicted)");
    }

    /// Entry count and approximate digest footprint, O(1) under the lock.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock().len();
        CacheStats {
            entries,
            digest_bytes: (entries * mem::size_of::<Digest>()) as u64,
        }
    }

    /// Acquire the map, recovering from a poisoned lock.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Digest>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(byte: u8) -> Digest {
        [byte; 32]
    }

    #[test]
    fn test_get_missing_is_none() {
        let cache = HashCache::new();
        assert_eq!(cache.get(Path::new("/a")), None);
    }

    #[test]
    fn test_insert_then_get() {
        let cache = HashCache::new();
        cache.insert(PathBuf::from("/a"), digest_of(1));
        assert_eq!(cache.get(Path::new("/a")), Some(digest_of(1)));
    }

    #[test]
    fn test_insert_replaces() {
        let cache = HashCache::new();
        cache.insert(PathBuf::from("/a"), digest_of(1));
        cache.insert(PathBuf::from("/a"), digest_of(2));
        assert_eq!(cache.get(Path::new("/a")), Some(digest_of(2)));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_clear_evicts_everything() {
        let cache = HashCache::new();
        cache.insert(PathBuf::from("/a"), digest_of(1));
        cache.insert(PathBuf::from("/b"), digest_of(2));
        cache.clear();
        assert_eq!(cache.get(Path::new("/a")), None);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_stats_digest_footprint() {
        let cache = HashCache::new();
        cache.insert(PathBuf::from("/a"), digest_of(1));
        cache.insert(PathBuf::from("/b"), digest_of(2));

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.digest_bytes, 64);
    }
}
