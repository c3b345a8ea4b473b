//! Summary numbers for the reporting/history collaborator.
//!
//! The shell's history log and report exporters receive plain data from
//! this module after a scan: per-category byte totals over a subtree. No
//! state is persisted here.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use bytesize::ByteSize;
use serde::Serialize;

use crate::classify::classify;
use crate::scanner::FileWalker;

/// Per-category byte totals for one subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    /// Bytes per category name, in deterministic (sorted) order
    pub totals: BTreeMap<&'static str, u64>,
}

impl CategoryBreakdown {
    /// Sum over all categories.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.totals.values().sum()
    }

    /// Total as a human-readable string.
    #[must_use]
    pub fn total_display(&self) -> String {
        ByteSize::b(self.total_bytes()).to_string()
    }
}

/// Walk the subtree under `root` and sum file sizes per category.
///
/// Uses the same silent-skip walk as duplicate candidacy; symlinks count
/// for nothing. If the shutdown flag fires mid-walk, the totals cover the
/// files seen so far.
#[must_use]
pub fn category_breakdown(
    root: &Path,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> CategoryBreakdown {
    let mut walker = FileWalker::new(root);
    if let Some(flag) = shutdown_flag {
        walker = walker.with_shutdown_flag(flag);
    }

    let mut totals: BTreeMap<&'static str, u64> = BTreeMap::new();
    for file in walker.collect_files() {
        *totals.entry(classify(&file.path)).or_insert(0) += file.size;
    }

    CategoryBreakdown { totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::Ordering;
    use tempfile::tempdir;

    #[test]
    fn test_breakdown_sums_per_category() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.png"), [0u8; 100]).unwrap();
        fs::write(dir.path().join("b.png"), [0u8; 50]).unwrap();
        fs::write(dir.path().join("c.pdf"), [0u8; 25]).unwrap();

        let breakdown = category_breakdown(dir.path(), None);
        assert_eq!(breakdown.totals.get("images"), Some(&150));
        assert_eq!(breakdown.totals.get("documents"), Some(&25));
        assert_eq!(breakdown.total_bytes(), 175);
    }

    #[test]
    fn test_breakdown_empty_tree() {
        let dir = tempdir().unwrap();
        let breakdown = category_breakdown(dir.path(), None);
        assert!(breakdown.totals.is_empty());
        assert_eq!(breakdown.total_bytes(), 0);
    }

    #[test]
    fn test_breakdown_cancelled_is_partial() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.png"), [0u8; 100]).unwrap();

        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::SeqCst);
        let breakdown = category_breakdown(dir.path(), Some(flag));
        assert_eq!(breakdown.total_bytes(), 0);
    }
}
