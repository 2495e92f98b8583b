//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Fingerprint index and duplicate groups (first-seen original is kept)
//! - Single-directory resolution: list, fingerprint, group, delete

pub mod groups;
pub mod resolver;

pub use groups::{DuplicateGroup, DuplicateGroups, FingerprintIndex, Grouper, Observation};
pub use resolver::{
    resolve_duplicates, DuplicatePlan, DuplicateResolver, Phase, Resolution, ResolveError,
    ResolverConfig,
};
