//! Subtree file enumeration for duplicate candidacy.
//!
//! # Overview
//!
//! This module provides the [`FileWalker`] struct, the single-threaded
//! discovery pass feeding the duplicate detector. It enumerates every
//! regular file under a root using the same explicit work stack and
//! silent-skip policy as [`super::SizeIndexer`]: permission errors and
//! vanished entries are ignored, and symlinks are never followed as
//! directories nor reported as candidates. Its cost is proportional to
//! directory-entry count, not file content size.
//!
//! # Example
//!
//! ```no_run
//! use spacesweep::scanner::FileWalker;
//! use std::path::Path;
//!
//! let walker = FileWalker::new(Path::new("/home/user")).with_min_size(1024);
//! let files = walker.collect_files();
//! println!("{} candidate files", files.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::FileEntry;

/// Flat, deterministic enumeration of the files under a root directory.
#[derive(Debug)]
pub struct FileWalker {
    /// Root path to walk
    root: PathBuf,
    /// Minimum file size to report (in bytes)
    min_size: u64,
    /// Optional shutdown flag for cooperative cancellation
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl FileWalker {
    /// Create a new walker for the given root.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            min_size: 0,
            shutdown_flag: None,
        }
    }

    /// Set the minimum file size; smaller files are not reported.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the shutdown flag for cooperative cancellation.
    ///
    /// The flag is re-checked before each pending directory is processed.
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

    /// Walk the subtree and collect every regular file of at least the
    /// configured minimum size.
    ///
    /// Symlinks are skipped entirely: a symlinked directory is not
    /// descended, and a symlinked file is not a candidate, so the same
    /// content is never reported twice through a link. Inaccessible
    /// entries are skipped silently. If the shutdown flag fires mid-walk,
    /// the files collected so far are returned.
    #[must_use]
    pub fn collect_files(&self) -> Vec<FileEntry> {
        let mut files = Vec::new();
        let mut pending: Vec<PathBuf> = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            if self.is_shutdown_requested() {
                log::debug!(
                    "Walk of {} interrupted with {} files collected",
                    self.root.display(),
                    files.len()
                );
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
                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(e) => {
                        log::debug!("Cannot stat {}: {}", entry.path().display(), e);
                        continue;
                    }
                };

                let file_type = metadata.file_type();
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() && metadata.len() >= self.min_size {
                    files.push(FileEntry::new(entry.path(), metadata.len()));
                }
            }
        }

        files
    }
}
