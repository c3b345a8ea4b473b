//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Iterative per-entry size measurement with an explicit work stack
//! - Size-sorted directory snapshots for the top-level view
//! - Subtree file enumeration for duplicate candidacy
//! - Content hashing with BLAKE3 (streaming)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`sizer`]: deep size of a single entry, cancellable, never recursive
//! - [`snapshot`]: size-sorted inventory of a directory's immediate children
//! - [`walker`]: flat enumeration of every file under a root
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use spacesweep::scanner::Snapshotter;
//! use std::path::Path;
//!
//! let snapshotter = Snapshotter::new();
//! for record in snapshotter.snapshot(Path::new("/home/user")).unwrap() {
//!     println!("{}: {} bytes", record.path.display(), record.size);
//! }
//! ```

pub mod hasher;
pub mod sizer;
pub mod snapshot;
pub mod walker;

use std::path::PathBuf;

use serde::Serialize;

// Re-export main types
pub use hasher::{digest_to_hex, Digest, Hasher, DEFAULT_CHUNK_SIZE};
pub use sizer::SizeIndexer;
pub use snapshot::Snapshotter;
pub use walker::FileWalker;

/// One immediate child of a snapshotted directory.
///
/// Immutable once created. [`Snapshotter::snapshot`] returns records sorted
/// by `size` descending; the UI depends on that ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute path to the entry
    pub path: PathBuf,
    /// Deep size for directories, own size for files and symlinks
    pub size: u64,
    /// Whether the entry is a directory
    pub is_directory: bool,
}

/// Metadata for a file discovered during a subtree walk.
///
/// Carries only what duplicate candidacy needs: the path and the exact size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
