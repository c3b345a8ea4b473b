//! Spacesweep - Disk Usage Analysis and Duplicate Detection Core
//!
//! A library for understanding and reclaiming disk space: it measures how
//! space is consumed across a directory tree and finds files that are
//! byte-for-byte identical, using BLAKE3 content hashing with bounded
//! parallelism and a thread-safe memoized hash cache. The crate is consumed
//! by a graphical shell; it performs detection only and never deletes files.

pub mod cache;
pub mod classify;
pub mod duplicates;
pub mod report;
pub mod scanner;
