//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3 digests
//! of file contents. Files are streamed in fixed-size chunks so a whole
//! file is never loaded into memory; the chunk size defaults to
//! [`DEFAULT_CHUNK_SIZE`].
//!
//! # Example
//!
//! ```no_run
//! use spacesweep::scanner::{digest_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.hash_file(Path::new("large.iso")).unwrap();
//! println!("{}", digest_to_hex(&digest));
//! ```

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// Default streaming chunk size: 8 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// A 256-bit BLAKE3 content digest.
pub type Digest = [u8; 32];

/// Render a digest as a lowercase hex string.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Streaming BLAKE3 file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    /// Bytes read per chunk while streaming
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a new hasher with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom streaming chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Compute the BLAKE3 digest of the file's full content.
    ///
    /// The file is read in `chunk_size` blocks; memory use is bounded by
    /// one chunk regardless of file size.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let mut file = File::open(path).map_err(|e| classify_io_error(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = file
                .read(&mut buffer)
                .map_err(|e| classify_io_error(path, e))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

/// Map an I/O error to the matching [`HashError`] variant.
fn classify_io_error(path: &Path, source: io::Error) -> HashError {
    match source.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}
