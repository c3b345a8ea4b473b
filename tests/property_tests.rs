use proptest::prelude::*;
use spacesweep::duplicates::{bucket_by_size, DuplicateGroup, RetentionStrategy};
use spacesweep::scanner::{FileEntry, Hasher};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

proptest! {
    #[test]
    fn test_hash_determinism(content in "\\PC*") {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        fs::write(&path, content.as_bytes()).unwrap();

        let hasher = Hasher::new();
        let hash1 = hasher.hash_file(&path).unwrap();
        let hash2 = hasher.hash_file(&path).unwrap();

        prop_assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_independent_of_chunk_size(content in "\\PC*", chunk in 1usize..4096) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        fs::write(&path, content.as_bytes()).unwrap();

        let reference = Hasher::new().hash_file(&path).unwrap();
        let chunked = Hasher::new().with_chunk_size(chunk).hash_file(&path).unwrap();

        prop_assert_eq!(reference, chunked);
    }

    #[test]
    fn test_bucket_by_size_invariants(sizes in prop::collection::vec(0u64..1000, 0..50)) {
        let entries: Vec<FileEntry> = sizes.iter().enumerate().map(|(i, &size)| {
            FileEntry::new(PathBuf::from(format!("/fake/path/{}", i)), size)
        }).collect();

        let (buckets, stats) = bucket_by_size(entries.clone());

        // Invariant: every path in a bucket came from a file of that size
        for (size, paths) in &buckets {
            for path in paths {
                let entry = entries.iter().find(|e| &e.path == path).unwrap();
                prop_assert_eq!(entry.size, *size);
            }
            // Invariant: surviving buckets hold at least 2 candidates
            prop_assert!(paths.len() >= 2);
        }

        // Invariant: every file is either a candidate or was eliminated
        // as the only one of its size
        prop_assert_eq!(stats.total_files, entries.len());
        let sum_candidates: usize = buckets.values().map(|v| v.len()).sum();
        prop_assert_eq!(stats.candidate_files, sum_candidates);
        prop_assert_eq!(stats.candidate_files + stats.eliminated_unique, entries.len());
    }

    #[test]
    fn test_selection_size_and_disjointness(
        member_count in 0usize..8,
        strategy_name in "[a-z_]{0,12}",
    ) {
        let members: Vec<PathBuf> = (0..member_count)
            .map(|i| PathBuf::from(format!("/fake/copy-{}.bin", i)))
            .collect();
        let group = DuplicateGroup::new([7u8; 32], 64, members.clone());

        let doomed = RetentionStrategy::from_name(&strategy_name).select_for_deletion(&group);

        let expected = if member_count <= 1 { 0 } else { member_count - 1 };
        prop_assert_eq!(doomed.len(), expected);

        // The retained member is never in the deletion list
        let kept: Vec<_> = members.iter().filter(|m| !doomed.contains(m)).collect();
        if member_count > 1 {
            prop_assert_eq!(kept.len(), 1);
        }
    }

    #[test]
    fn test_wasted_space_formula(file_size in 0u64..1_000_000, copies in 2usize..10) {
        let members: Vec<PathBuf> = (0..copies)
            .map(|i| PathBuf::from(format!("/fake/{}", i)))
            .collect();
        let group = DuplicateGroup::new([1u8; 32], file_size, members);

        prop_assert_eq!(group.wasted_space, file_size * (copies as u64 - 1));
    }
}
