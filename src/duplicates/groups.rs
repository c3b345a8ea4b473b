//! Size bucketing and duplicate group types.
//!
//! # Overview
//!
//! Size bucketing is the first phase of duplicate detection: files are
//! grouped by their exact size, and only buckets with two or more members
//! proceed to hashing, since files of different sizes cannot be identical.
//! Size equality is merely the candidate filter; files are presumed
//! identical only on exact digest equality.
//!
//! # Example
//!
//! ```
//! use spacesweep::duplicates::bucket_by_size;
//! use spacesweep::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/a.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/b.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/c.txt"), 2048),
//! ];
//!
//! let (buckets, stats) = bucket_by_size(files);
//! assert_eq!(buckets.len(), 1); // only the 1024-byte bucket survives
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::{digest_to_hex, Digest, FileEntry};

/// A confirmed group of byte-for-byte identical files.
///
/// Created once per unique digest per scan and never mutated afterwards.
/// Member order comes from the hashing batch and carries no guarantee; it
/// is neither a filesystem order nor a sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// BLAKE3 digest shared by every member
    pub digest: Digest,
    /// Size in bytes of each member
    pub file_size: u64,
    /// Paths of the identical files
    pub members: Vec<PathBuf>,
    /// Bytes reclaimable by keeping a single copy
    pub wasted_space: u64,
}

impl DuplicateGroup {
    /// Create a new group; `wasted_space` is derived from the member count.
    #[must_use]
    pub fn new(digest: Digest, file_size: u64, members: Vec<PathBuf>) -> Self {
        let wasted_space = file_size * (members.len() as u64).saturating_sub(1);
        Self {
            digest,
            file_size,
            members,
            wasted_space,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of redundant copies (total minus the one to keep).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Total size of all members.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.file_size * self.members.len() as u64
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }
}

/// Statistics from the size-bucketing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes seen
    pub unique_sizes: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of files that could still be duplicates
    pub candidate_files: usize,
    /// Number of buckets with 2+ files
    pub candidate_buckets: usize,
}

impl BucketStats {
    /// Percentage of files eliminated by size bucketing.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Bucket files by exact size, keeping only buckets with 2+ members.
///
/// This phase is metadata-only: no file content is read, so its cost is
/// proportional to the file count. The bucketing is strictly sequential and
/// deterministic for a given input. Buckets are transient; the caller
/// consumes them and they are discarded once hashing is dispatched.
#[must_use]
pub fn bucket_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (HashMap<u64, Vec<PathBuf>>, BucketStats) {
    let mut buckets: HashMap<u64, Vec<PathBuf>> = HashMap::new();
    let mut stats = BucketStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        buckets.entry(file.size).or_default().push(file.path);
    }

    stats.unique_sizes = buckets.len();

    let survivors: HashMap<u64, Vec<PathBuf>> = buckets
        .into_iter()
        .filter(|(size, paths)| {
            if paths.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!("Eliminated unique size {}: {}", size, paths[0].display());
                false
            } else {
                stats.candidate_files += paths.len();
                stats.candidate_buckets += 1;
                log::debug!("Size bucket {} bytes: {} candidates", size, paths.len());
                true
            }
        })
        .collect();

    log::info!(
        "Size bucketing: {} files, {} candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.candidate_files,
        stats.elimination_rate()
    );

    (survivors, stats)
}
