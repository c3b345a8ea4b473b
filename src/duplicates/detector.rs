//! Duplicate detection orchestrator.
//!
//! # Overview
//!
//! [`DuplicateDetector`] runs the two-phase detection pipeline:
//! 1. **Size bucketing**: walk the subtree single-threaded and bucket
//!    files by exact size (see [`crate::duplicates::groups`]); only buckets
//!    with 2+ members can contain duplicates.
//! 2. **Hash confirmation**: stream-hash every surviving candidate on a
//!    bounded worker pool, memoizing digests in a shared [`HashCache`], and
//!    group completed digests into [`DuplicateGroup`]s.
//!
//! The detector never deletes anything: it hands groups to the caller, who
//! performs the destructive action after a defensive
//! [`verify`](DuplicateDetector::verify).
//!
//! # Example
//!
//! ```no_run
//! use spacesweep::duplicates::{DetectorConfig, DuplicateDetector};
//! use std::path::Path;
//!
//! let detector = DuplicateDetector::new(DetectorConfig::default());
//! let (groups, summary) = detector
//!     .find_duplicates(Path::new("/home/user"), 1024)
//!     .unwrap();
//!
//! println!(
//!     "{} groups, {} reclaimable",
//!     groups.len(),
//!     summary.wasted_display()
//! );
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;
use serde::Serialize;

use crate::cache::{CacheStats, HashCache};
use crate::scanner::{digest_to_hex, Digest, FileWalker, Hasher, DEFAULT_CHUNK_SIZE};

use super::groups::{bucket_by_size, DuplicateGroup};
use super::retention::RetentionStrategy;

/// Configuration for the duplicate detector.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Number of worker threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub worker_threads: usize,
    /// Streaming chunk size for hashing, in bytes.
    pub chunk_size: usize,
    /// Optional shutdown flag for cooperative cancellation.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
        }
    }
}

impl DetectorConfig {
    /// Set the worker pool size.
    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.max(1);
        self
    }

    /// Set the streaming chunk size for hashing.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag for cooperative cancellation.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that can occur when starting a duplicate scan.
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Summary statistics from a duplicate scan.
///
/// These are the numbers handed to the history/reporting collaborator
/// after a scan completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Total number of files considered (size >= the minimum)
    pub total_files: usize,
    /// Total size of all considered files in bytes
    pub total_size: u64,
    /// Number of files eliminated by size bucketing (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Number of files that failed to hash (I/O errors)
    pub failed_files: usize,
    /// Number of digests served from the memo cache
    pub cache_hits: usize,
    /// Number of digests computed fresh
    pub cache_misses: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of redundant copies across all groups
    pub duplicate_files: usize,
    /// Total space reclaimable by keeping one copy per group
    pub wasted_space: u64,
    /// Duration of the scan
    pub scan_duration: Duration,
    /// Whether the scan was cut short by the shutdown flag
    pub interrupted: bool,
}

impl ScanSummary {
    /// Percentage of scanned bytes wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.wasted_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn wasted_display(&self) -> String {
        ByteSize::b(self.wasted_space).to_string()
    }

    /// Total scanned size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Two-phase duplicate detector with a memoizing hash cache.
///
/// One instance owns one [`HashCache`]; digests accumulate across
/// [`find_duplicates`](Self::find_duplicates) and
/// [`verify`](Self::verify) calls until
/// [`clear_cache`](Self::clear_cache).
pub struct DuplicateDetector {
    config: DetectorConfig,
    hasher: Arc<Hasher>,
    cache: Arc<HashCache>,
}

impl DuplicateDetector {
    /// Create a new detector with the given configuration.
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        let hasher = Hasher::new().with_chunk_size(config.chunk_size);
        Self {
            config,
            hasher: Arc::new(hasher),
            cache: Arc::new(HashCache::new()),
        }
    }

    /// Create a new detector with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DetectorConfig::default())
    }

    /// Find all groups of byte-for-byte identical files under `path`.
    ///
    /// Only files of at least `min_size` bytes are considered. Returns the
    /// confirmed groups keyed by digest, plus a [`ScanSummary`].
    ///
    /// Cancellation is not an error: if the shutdown flag is set before
    /// hashing is dispatched the result is empty with
    /// `summary.interrupted == true`; hashing tasks already running are
    /// allowed to finish, and groups are assembled from whatever completed.
    /// A file that cannot be read during hashing is excluded from its
    /// candidate group without failing the batch; groups left with a single
    /// survivor are never emitted.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError`] if `path` does not exist or is not a
    /// directory.
    pub fn find_duplicates(
        &self,
        path: &Path,
        min_size: u64,
    ) -> Result<(HashMap<Digest, DuplicateGroup>, ScanSummary), DetectorError> {
        let start = Instant::now();
        let mut summary = ScanSummary::default();

        if !path.exists() {
            return Err(DetectorError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(DetectorError::NotADirectory(path.to_path_buf()));
        }

        if self.config.is_shutdown_requested() {
            summary.interrupted = true;
            return Ok((HashMap::new(), summary));
        }

        log::info!(
            "Scanning {} for duplicates (min size {} bytes)",
            path.display(),
            min_size
        );

        // Phase 1: enumerate and bucket by size, single-threaded
        let mut walker = FileWalker::new(path).with_min_size(min_size);
        if let Some(flag) = &self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        let files = walker.collect_files();

        let (buckets, bucket_stats) = bucket_by_size(files);
        summary.total_files = bucket_stats.total_files;
        summary.total_size = bucket_stats.total_size;
        summary.eliminated_by_size = bucket_stats.eliminated_unique;

        // Cancellation between the walk and hash dispatch bounds future
        // work; nothing has been read yet, so the result is simply empty.
        if self.config.is_shutdown_requested() {
            summary.interrupted = true;
            summary.scan_duration = start.elapsed();
            log::info!("Scan of {} cancelled before hashing", path.display());
            return Ok((HashMap::new(), summary));
        }

        if buckets.is_empty() {
            summary.scan_duration = start.elapsed();
            log::info!("No size-equal candidates under {}", path.display());
            return Ok((HashMap::new(), summary));
        }

        // Phase 2: hash candidates on a bounded pool. The buckets are
        // consumed here; no transient state outlives the call.
        let tasks: Vec<(u64, PathBuf)> = buckets
            .into_iter()
            .flat_map(|(size, paths)| paths.into_iter().map(move |p| (size, p)))
            .collect();

        log::info!(
            "Hashing {} candidate files on {} worker threads",
            tasks.len(),
            self.config.worker_threads
        );

        let results = self.hash_batch(tasks);

        if self.config.is_shutdown_requested() {
            summary.interrupted = true;
        }

        // Group completed digests; member order carries no guarantee
        let mut by_digest: HashMap<Digest, (u64, Vec<PathBuf>)> = HashMap::new();
        for outcome in results {
            match outcome {
                HashOutcome::Done {
                    path,
                    size,
                    digest,
                    cache_hit,
                } => {
                    summary.hashed_files += 1;
                    if cache_hit {
                        summary.cache_hits += 1;
                    } else {
                        summary.cache_misses += 1;
                    }
                    by_digest.entry(digest).or_insert_with(|| (size, Vec::new())).1.push(path);
                }
                HashOutcome::Failed => summary.failed_files += 1,
                HashOutcome::Skipped => {}
            }
        }

        let groups: HashMap<Digest, DuplicateGroup> = by_digest
            .into_iter()
            .filter(|(_, (_, members))| members.len() > 1)
            .map(|(digest, (size, members))| {
                log::debug!(
                    "Duplicate group {}: {} files, {} bytes each",
                    digest_to_hex(&digest),
                    members.len(),
                    size
                );
                (digest, DuplicateGroup::new(digest, size, members))
            })
            .collect();

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.values().map(DuplicateGroup::duplicate_count).sum();
        summary.wasted_space = groups.values().map(|g| g.wasted_space).sum();
        summary.scan_duration = start.elapsed();

        log::info!(
            "Scan complete: {} groups, {} redundant copies, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.wasted_display()
        );

        Ok((groups, summary))
    }

    /// Run one hashing task per candidate on a pool bounded at the
    /// configured width. Tasks consult the cache under its mutex, stream the
    /// file otherwise, and memoize successes; no ordering is guaranteed
    /// across tasks.
    fn hash_batch(&self, tasks: Vec<(u64, PathBuf)>) -> Vec<HashOutcome> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads)
            .build()
            .unwrap_or_else(|_| {
                log::warn!(
                    "Failed to create bounded thread pool, using default with {} threads",
                    rayon::current_num_threads()
                );
                rayon::ThreadPoolBuilder::new().build().unwrap()
            });

        pool.install(|| {
            tasks
                .into_par_iter()
                .map(|(size, path)| {
                    // Already-dispatched work finishes; this check only
                    // bounds tasks that have not started reading yet.
                    if self.config.is_shutdown_requested() {
                        return HashOutcome::Skipped;
                    }

                    if let Some(digest) = self.cache.get(&path) {
                        log::trace!("Hash cache hit: {}", path.display());
                        return HashOutcome::Done {
                            path,
                            size,
                            digest,
                            cache_hit: true,
                        };
                    }

                    match self.hasher.hash_file(&path) {
                        Ok(digest) => {
                            self.cache.insert(path.clone(), digest);
                            HashOutcome::Done {
                                path,
                                size,
                                digest,
                                cache_hit: false,
                            }
                        }
                        Err(e) => {
                            log::warn!("Failed to hash {}: {}", path.display(), e);
                            HashOutcome::Failed
                        }
                    }
                })
                .collect()
        })
    }

    /// Check that every path in `paths` currently carries the same content
    /// digest. Trivially true for zero or one path; false if any file fails
    /// to hash.
    ///
    /// This is the defensive re-check to run immediately before deleting,
    /// since files can change between detection and action. Memoized
    /// digests are reused when present; a caller that wants a from-disk
    /// confirmation should call [`clear_cache`](Self::clear_cache) first.
    #[must_use]
    pub fn verify(&self, paths: &[PathBuf]) -> bool {
        if paths.len() <= 1 {
            return true;
        }

        let mut expected: Option<Digest> = None;
        for path in paths {
            let digest = match self.cache.get(path) {
                Some(digest) => digest,
                None => match self.hasher.hash_file(path) {
                    Ok(digest) => {
                        self.cache.insert(path.clone(), digest);
                        digest
                    }
                    Err(e) => {
                        log::warn!("Verification failed to hash {}: {}", path.display(), e);
                        return false;
                    }
                },
            };

            match expected {
                None => expected = Some(digest),
                Some(first) if first != digest => return false,
                Some(_) => {}
            }
        }

        true
    }

    /// Return every member of `group` except the one the named retention
    /// strategy keeps. An unknown strategy name falls back to `first`.
    ///
    /// The caller performs the actual deletion; this core only selects.
    #[must_use]
    pub fn select_for_deletion(&self, group: &DuplicateGroup, strategy: &str) -> Vec<PathBuf> {
        RetentionStrategy::from_name(strategy).select_for_deletion(group)
    }

    /// Evict every memoized digest.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Entry count and approximate byte footprint of the memoized digests.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Result of a single hashing task.
enum HashOutcome {
    /// Digest obtained, from cache or fresh
    Done {
        path: PathBuf,
        size: u64,
        digest: Digest,
        cache_hit: bool,
    },
    /// The file could not be opened or read
    Failed,
    /// The task observed the shutdown flag before starting
    Skipped,
}
