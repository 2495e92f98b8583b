//! Fingerprint index and duplicate groups.
//!
//! # Overview
//!
//! Grouping is fed one fingerprinted file at a time, in listing order:
//!
//! - the first path seen for a fingerprint becomes the retained original and
//!   is stored in the [`FingerprintIndex`];
//! - every later path with the same fingerprint is appended to that
//!   fingerprint's [`DuplicateGroup`].
//!
//! An original never appears in [`DuplicateGroups`]. Groups keep the order in
//! which their first duplicate was observed, and paths within a group keep
//! listing order, so deletion is deterministic for a given listing.
//!
//! # Example
//!
//! ```
//! use dlsort::duplicates::{Grouper, Observation};
//! use dlsort::scanner::{Fingerprint, HashAlgorithm};
//! use std::path::Path;
//!
//! let fp = Fingerprint::from_digest(HashAlgorithm::Sha256, [1; 32]);
//! let mut grouper = Grouper::new();
//!
//! assert_eq!(grouper.observe(fp, Path::new("a.txt"), 5), Observation::Original);
//! assert!(matches!(grouper.observe(fp, Path::new("b.txt"), 5), Observation::Duplicate { .. }));
//!
//! let (index, groups) = grouper.finish();
//! assert_eq!(index.original(&fp), Some(Path::new("a.txt")));
//! assert_eq!(groups.duplicate_count(), 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::Fingerprint;

/// Fingerprint to first-seen path.
#[derive(Debug, Clone, Default)]
pub struct FingerprintIndex {
    originals: HashMap<Fingerprint, PathBuf>,
}

impl FingerprintIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as the original for `fingerprint`.
    ///
    /// Returns `false` and leaves the index untouched if the fingerprint
    /// already has an original.
    pub fn insert(&mut self, fingerprint: Fingerprint, path: &Path) -> bool {
        if self.originals.contains_key(&fingerprint) {
            return false;
        }
        self.originals.insert(fingerprint, path.to_path_buf());
        true
    }

    /// Retained original for a fingerprint.
    #[must_use]
    pub fn original(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.originals.get(fingerprint).map(PathBuf::as_path)
    }

    /// Whether the fingerprint has been seen.
    #[must_use]
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.originals.contains_key(fingerprint)
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Check if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Iterate over `(fingerprint, original)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &Path)> {
        self.originals.iter().map(|(fp, p)| (fp, p.as_path()))
    }
}

/// Duplicates of one original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared content fingerprint
    pub fingerprint: Fingerprint,
    /// The retained copy (first in listing order)
    pub original: PathBuf,
    /// Every later copy, in listing order
    pub duplicates: Vec<PathBuf>,
    /// Content size in bytes (identical for all members)
    pub size: u64,
}

impl DuplicateGroup {
    /// Number of copies that will be removed.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Bytes freed once every duplicate is removed.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.size * self.duplicates.len() as u64
    }
}

/// Fingerprints observed more than once, with every path after the first.
#[derive(Debug, Clone, Default)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
    positions: HashMap<Fingerprint, usize>,
}

impl DuplicateGroups {
    /// Create an empty set of groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` as a duplicate of `original`.
    pub fn push(&mut self, fingerprint: Fingerprint, original: &Path, path: &Path, size: u64) {
        match self.positions.get(&fingerprint) {
            Some(&idx) => self.groups[idx].duplicates.push(path.to_path_buf()),
            None => {
                self.positions.insert(fingerprint, self.groups.len());
                self.groups.push(DuplicateGroup {
                    fingerprint,
                    original: original.to_path_buf(),
                    duplicates: vec![path.to_path_buf()],
                    size,
                });
            }
        }
    }

    /// Group for a fingerprint, if it has duplicates.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&DuplicateGroup> {
        self.positions.get(fingerprint).map(|&idx| &self.groups[idx])
    }

    /// Iterate groups in the order their first duplicate was seen.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of paths marked for deletion.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Total bytes freed once every duplicate is removed.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::reclaimable_bytes).sum()
    }
}

impl<'a> IntoIterator for &'a DuplicateGroups {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// What grouping decided for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First file with this fingerprint; it is kept.
    Original,
    /// Same content as an earlier file; it is marked for deletion.
    Duplicate {
        /// The retained original
        original: PathBuf,
    },
}

/// Builds a [`FingerprintIndex`] and [`DuplicateGroups`] from files fed in
/// listing order.
#[derive(Debug, Default)]
pub struct Grouper {
    index: FingerprintIndex,
    groups: DuplicateGroups,
}

impl Grouper {
    /// Create an empty grouper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fingerprinted file.
    pub fn observe(&mut self, fingerprint: Fingerprint, path: &Path, size: u64) -> Observation {
        match self.index.original(&fingerprint) {
            Some(original) => {
                let original = original.to_path_buf();
                self.groups.push(fingerprint, &original, path, size);
                Observation::Duplicate { original }
            }
            None => {
                self.index.insert(fingerprint, path);
                Observation::Original
            }
        }
    }

    /// Stop grouping and hand back both structures.
    #[must_use]
    pub fn finish(self) -> (FingerprintIndex, DuplicateGroups) {
        (self.index, self.groups)
    }
}
