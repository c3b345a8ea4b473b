//! Size-sorted directory snapshots.
//!
//! # Overview
//!
//! This module provides the [`Snapshotter`] struct, which lists the
//! immediate children of one directory and asks [`SizeIndexer`] for each
//! child's size (deep size for subdirectories, own size for files and
//! symlinks). The result is the size-sorted inventory behind the top-level
//! "where did my space go" view.
//!
//! # Example
//!
//! ```no_run
//! use spacesweep::scanner::Snapshotter;
//! use std::path::Path;
//!
//! let snapshotter = Snapshotter::new();
//! let records = snapshotter.snapshot(Path::new("/var")).unwrap();
//! for record in &records {
//!     println!("{}: {} bytes", record.path.display(), record.size);
//! }
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{FileRecord, ScanError, SizeIndexer};

/// Produces a size-sorted inventory of a directory's immediate children.
#[derive(Debug, Default)]
pub struct Snapshotter {
    /// Optional shutdown flag for cooperative cancellation
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Snapshotter {
    /// Create a new snapshotter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for cooperative cancellation.
    ///
    /// The flag is checked before each top-level child; if it fires
    /// mid-iteration, whatever was collected so far is returned.
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

    /// Snapshot the immediate children of `path`, sorted by size descending.
    ///
    /// Subdirectories carry their deep size, files and symlinks their own
    /// recorded size. Inaccessible children are skipped silently. Ties in
    /// size may appear in any order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] if `path` does not exist,
    /// [`ScanError::NotADirectory`] if it exists but is not a directory, and
    /// [`ScanError::Io`] if the directory itself cannot be listed.
    pub fn snapshot(&self, path: &Path) -> Result<Vec<FileRecord>, ScanError> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ScanError::NotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(ScanError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(path.to_path_buf()));
        }

        let reader = fs::read_dir(path).map_err(|e| ScanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut sizer = SizeIndexer::new();
        if let Some(flag) = &self.shutdown_flag {
            sizer = sizer.with_shutdown_flag(flag.clone());
        }

        let mut records = Vec::new();
        for entry in reader.flatten() {
            if self.is_shutdown_requested() {
                log::debug!(
                    "Snapshot of {} interrupted after {} children",
                    path.display(),
                    records.len()
                );
                break;
            }

            let child = entry.path();
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    log::debug!("Skipping {}: {}", child.display(), e);
                    continue;
                }
            };

            let is_directory = metadata.is_dir();
            let size = if is_directory {
                sizer.size_of(&child)
            } else {
                metadata.len()
            };

            records.push(FileRecord {
                path: child,
                size,
                is_directory,
            });
        }

        // Largest consumers first; the UI depends on this ordering
        records.sort_by(|a, b| b.size.cmp(&a.size));

        Ok(records)
    }
}
