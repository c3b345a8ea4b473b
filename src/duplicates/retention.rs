//! Retention strategies for choosing which duplicate copies to delete.
//!
//! A retention strategy picks the single member of a [`DuplicateGroup`]
//! that survives; every other member is returned for deletion. The actual
//! deletion is the caller's job.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::groups::DuplicateGroup;

/// Named rule for picking the surviving member of a duplicate group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetentionStrategy {
    /// Keep the first member in the group's stored order.
    #[default]
    First,
    /// Keep the member with the fewest characters in its path.
    ShortestPath,
    /// Keep the member with the greatest last-modified timestamp.
    Newest,
    /// Keep the member with the least last-modified timestamp.
    Oldest,
}

impl RetentionStrategy {
    /// Resolve a strategy by name.
    ///
    /// Unknown names fall back to [`RetentionStrategy::First`] with a
    /// warning; an unrecognized name is never an error.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "first" => Self::First,
            "shortest_path" => Self::ShortestPath,
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            other => {
                log::warn!("Unknown retention strategy '{other}', falling back to 'first'");
                Self::First
            }
        }
    }

    /// The canonical name of this strategy.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::ShortestPath => "shortest_path",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }

    /// Return every member of `group` except the one this strategy keeps.
    ///
    /// Ties keep the first occurrence in stored order. Groups with one or
    /// zero members have nothing to delete.
    ///
    /// For [`Newest`](Self::Newest)/[`Oldest`](Self::Oldest), a member
    /// whose modification time cannot be read is treated as timestamp 0,
    /// which can make it incorrectly "oldest"; this mirrors the upstream
    /// behavior rather than masking it.
    #[must_use]
    pub fn select_for_deletion(&self, group: &DuplicateGroup) -> Vec<PathBuf> {
        if group.members.len() <= 1 {
            return Vec::new();
        }

        let keep = match self {
            Self::First => 0,
            Self::ShortestPath => index_of_min_by_key(&group.members, |path| {
                path.to_string_lossy().chars().count()
            }),
            Self::Newest => index_of_max_by_key(&group.members, |path| modified_time(path)),
            Self::Oldest => index_of_min_by_key(&group.members, |path| modified_time(path)),
        };

        log::debug!(
            "Retention '{}' keeps {} of {} members",
            self.name(),
            group.members[keep].display(),
            group.members.len()
        );

        group
            .members
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != keep)
            .map(|(_, path)| path.clone())
            .collect()
    }
}

/// Last-modified time of `path`, or the epoch when it cannot be read.
fn modified_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Index of the smallest key, first occurrence winning ties.
fn index_of_min_by_key<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> usize {
    let mut best = 0;
    let mut best_key = key(&items[0]);
    for (index, item) in items.iter().enumerate().skip(1) {
        let candidate = key(item);
        if candidate < best_key {
            best = index;
            best_key = candidate;
        }
    }
    best
}

/// Index of the largest key, first occurrence winning ties.
fn index_of_max_by_key<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> usize {
    let mut best = 0;
    let mut best_key = key(&items[0]);
    for (index, item) in items.iter().enumerate().skip(1) {
        let candidate = key(item);
        if candidate > best_key {
            best = index;
            best_key = candidate;
        }
    }
    best
}
