//! Iterative per-entry size measurement.
//!
//! # Overview
//!
//! This module provides the [`SizeIndexer`] struct for computing the byte
//! size of a single filesystem entry: a file, a symlink, or a whole subtree.
//! Directory traversal uses an explicit work stack of pending directories,
//! never recursive function calls, so arbitrarily deep trees cannot exhaust
//! the call stack. Symlink targets are never traversed, which rules out
//! cycles and double counting structurally.
//!
//! # Example
//!
//! ```no_run
//! use spacesweep::scanner::SizeIndexer;
//! use std::path::Path;
//!
//! let indexer = SizeIndexer::new();
//! let bytes = indexer.size_of(Path::new("/home/user/Downloads"));
//! println!("{} bytes", bytes);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Computes the deep size of filesystem entries without following symlinks.
#[derive(Debug, Default)]
pub struct SizeIndexer {
    /// Optional shutdown flag for cooperative cancellation
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl SizeIndexer {
    /// Create a new size indexer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for cooperative cancellation.
    ///
    /// The flag is re-checked before each pending directory is processed,
    /// so a running walk stops in bounded time once the flag is set.
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

    /// Compute the size in bytes of the entry at `path`.
    ///
    /// Symlinks and regular files report their own recorded size; symlink
    /// targets are never consulted. For directories, the sum of all file and
    /// symlink sizes in the subtree is returned, descending into
    /// subdirectories via an explicit work stack.
    ///
    /// Entries that vanish mid-walk or cannot be read contribute 0 and never
    /// abort the computation. If the shutdown flag is already set, returns 0
    /// immediately; if it fires mid-walk, the partial total so far is
    /// returned.
    #[must_use]
    pub fn size_of(&self, path: &Path) -> u64 {
        if self.is_shutdown_requested() {
            return 0;
        }

        // lstat semantics: a symlink reports the link's own size
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) => {
                log::debug!("Cannot stat {}: {}", path.display(), e);
                return 0;
            }
        };

        if !metadata.is_dir() {
            return metadata.len();
        }

        let mut total: u64 = 0;
        let mut pending: Vec<PathBuf> = vec![path.to_path_buf()];

        while let Some(dir) = pending.pop() {
            if self.is_shutdown_requested() {
                log::debug!("Size walk interrupted at {}", dir.display());
                break;
            }

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::debug!("Cannot read {}: {}", dir.display(), e);
                    continue;
                }
            };

            for entry in entries.flatten() {
                // DirEntry::metadata does not traverse symlinks
                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(e) => {
                        log::debug!("Cannot stat {}: {}", entry.path().display(), e);
                        continue;
                    }
                };

                if metadata.is_dir() {
                    pending.push(entry.path());
                } else {
                    total = total.saturating_add(metadata.len());
                }
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_size_of_regular_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.bin");
        File::create(&path).unwrap().write_all(&[0u8; 300]).unwrap();

        let indexer = SizeIndexer::new();
        assert_eq!(indexer.size_of(&path), 300);
    }

    #[test]
    fn test_size_of_missing_path_is_zero() {
        let indexer = SizeIndexer::new();
        assert_eq!(indexer.size_of(Path::new("/definitely/not/here")), 0);
    }

    #[test]
    fn test_size_of_directory_sums_subtree() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.bin"), [0u8; 100]).unwrap();
        fs::write(dir.path().join("sub/b.bin"), [0u8; 200]).unwrap();

        let indexer = SizeIndexer::new();
        assert_eq!(indexer.size_of(dir.path()), 300);
    }

    #[test]
    fn test_size_of_empty_directory() {
        let dir = tempdir().unwrap();
        let indexer = SizeIndexer::new();
        assert_eq!(indexer.size_of(dir.path()), 0);
    }

    #[test]
    fn test_size_of_deep_tree_does_not_overflow_stack() {
        let dir = tempdir().unwrap();
        let mut current = dir.path().to_path_buf();
        for i in 0..512 {
            current = current.join(format!("d{i}"));
        }
        fs::create_dir_all(&current).unwrap();
        fs::write(current.join("leaf.bin"), [0u8; 64]).unwrap();

        let indexer = SizeIndexer::new();
        assert_eq!(indexer.size_of(dir.path()), 64);
    }

    #[cfg(unix)]
    #[test]
    fn test_size_of_symlink_reports_link_not_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.bin");
        fs::write(&target, [0u8; 4096]).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let indexer = SizeIndexer::new();
        let link_size = fs::symlink_metadata(&link).unwrap().len();
        assert_eq!(indexer.size_of(&link), link_size);
        assert_ne!(indexer.size_of(&link), 4096);
    }

    #[cfg(unix)]
    #[test]
    fn test_size_of_does_not_descend_symlinked_directory() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("big.bin"), [0u8; 8192]).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();
        fs::write(dir.path().join("small.bin"), [0u8; 10]).unwrap();

        let indexer = SizeIndexer::new();
        let link_size = fs::symlink_metadata(dir.path().join("link")).unwrap().len();
        // The symlink counts for its own size only; the target tree is untouched
        assert_eq!(indexer.size_of(dir.path()), 10 + link_size);
    }

    #[test]
    fn test_size_of_cancelled_before_start_returns_zero() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), [0u8; 100]).unwrap();

        let flag = Arc::new(AtomicBool::new(true));
        let indexer = SizeIndexer::new().with_shutdown_flag(flag);
        assert_eq!(indexer.size_of(dir.path()), 0);
    }
}
