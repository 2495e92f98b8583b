//! Duplicate resolution for a single directory.
//!
//! # Overview
//!
//! A resolution pass walks through these phases, strictly in order:
//!
//! 1. **Listing** - direct entries of the directory; subdirectories skipped
//! 2. **Fingerprinting** - every file, in listing order
//! 3. **Grouping** - first path per fingerprint is kept, later ones are marked
//! 4. **Deleting** - marked paths are removed through a [`Deleter`]
//!
//! Any error moves the pass to [`Phase::Failed`] and is returned at once:
//!
//! - a file that cannot be opened or read aborts the pass before anything is
//!   deleted;
//! - a failed deletion stops the pass; files already removed stay removed and
//!   files not yet reached are left alone.
//!
//! [`DuplicateResolver::plan`] runs phases 1-3 without touching the
//! filesystem; [`DuplicateResolver::apply`] runs phase 4 on a plan.
//!
//! # Example
//!
//! ```no_run
//! use dlsort::duplicates::{DuplicateResolver, ResolverConfig};
//! use dlsort::scanner::ListingOrder;
//! use std::path::Path;
//!
//! let config = ResolverConfig::default().with_order(ListingOrder::Name);
//! let resolver = DuplicateResolver::permanent(config);
//! let resolution = resolver.resolve(Path::new("Downloads/Images")).unwrap();
//! println!("removed {} duplicate(s)", resolution.deleted.len());
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::groups::{DuplicateGroups, FingerprintIndex, Grouper, Observation};
use crate::actions::{Deleter, PermanentDeleter};
use crate::progress::ProgressCallback;
use crate::scanner::{
    list_directory, FingerprintError, HashAlgorithm, Hasher, ListingOrder, ScanError,
};

/// Phase of a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Enumerating the directory.
    Listing,
    /// Hashing file content.
    Fingerprinting,
    /// Sealing the fingerprint index and duplicate groups.
    Grouping,
    /// Removing duplicates.
    Deleting,
    /// Every duplicate was removed.
    Done,
    /// The pass was aborted.
    Failed,
}

impl Phase {
    /// Lowercase phase name, as passed to progress callbacks.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Fingerprinting => "fingerprinting",
            Self::Grouping => "grouping",
            Self::Deleting => "deleting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a resolution pass.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// The directory could not be listed.
    #[error("cannot read directory {path}: {source}")]
    DirectoryRead {
        /// Directory that failed to list
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file could not be opened for fingerprinting.
    #[error("cannot open {path}: {source}")]
    Open {
        /// File that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file could not be read to the end.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that failed to read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A confirmed duplicate could not be removed.
    #[error("cannot delete {path}: {source}")]
    Delete {
        /// File that failed to delete
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryRead { path, .. }
            | Self::Open { path, .. }
            | Self::Read { path, .. }
            | Self::Delete { path, .. } => path,
        }
    }

    /// Phase that was running when the error occurred.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::DirectoryRead { .. } => Phase::Listing,
            Self::Open { .. } | Self::Read { .. } => Phase::Fingerprinting,
            Self::Delete { .. } => Phase::Deleting,
        }
    }
}

impl From<ScanError> for ResolveError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::DirectoryRead { path, source } => Self::DirectoryRead { path, source },
        }
    }
}

impl From<FingerprintError> for ResolveError {
    fn from(err: FingerprintError) -> Self {
        match err {
            FingerprintError::Open { path, source } => Self::Open { path, source },
            FingerprintError::Read { path, source } => Self::Read { path, source },
        }
    }
}

/// Configuration for a resolution pass.
#[derive(Clone, Default)]
pub struct ResolverConfig {
    /// Order in which directory entries are fingerprinted.
    pub order: ListingOrder,
    /// Hash function for fingerprints.
    pub algorithm: HashAlgorithm,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("order", &self.order)
            .field("algorithm", &self.algorithm)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ResolverConfig {
    /// Set the listing order.
    #[must_use]
    pub fn with_order(mut self, order: ListingOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the hash algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Outcome of phases 1-3: what would be deleted, and what is kept.
#[derive(Debug, Clone)]
pub struct DuplicatePlan {
    /// Directory that was scanned
    pub directory: PathBuf,
    /// Number of files fingerprinted
    pub files_scanned: usize,
    /// Fingerprint to retained original
    pub originals: FingerprintIndex,
    /// Paths to delete, grouped by fingerprint
    pub groups: DuplicateGroups,
}

impl DuplicatePlan {
    /// Check if there is nothing to delete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Outcome of a completed pass.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Directory that was scanned
    pub directory: PathBuf,
    /// Number of files fingerprinted
    pub files_scanned: usize,
    /// Fingerprint to retained original
    pub originals: FingerprintIndex,
    /// Duplicate groups that were processed
    pub groups: DuplicateGroups,
    /// Paths removed, in deletion order
    pub deleted: Vec<PathBuf>,
    /// Bytes freed by the deletions
    pub bytes_reclaimed: u64,
    /// True when the deleter left files in place
    pub dry_run: bool,
}

/// Finds and removes duplicate files in one directory.
pub struct DuplicateResolver {
    config: ResolverConfig,
    hasher: Hasher,
    deleter: Box<dyn Deleter>,
}

impl fmt::Debug for DuplicateResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateResolver")
            .field("config", &self.config)
            .field("dry_run", &self.deleter.is_dry_run())
            .finish()
    }
}

impl DuplicateResolver {
    /// Create a resolver that removes files through `deleter`.
    #[must_use]
    pub fn new(config: ResolverConfig, deleter: impl Deleter + 'static) -> Self {
        Self::with_boxed_deleter(config, Box::new(deleter))
    }

    /// Create a resolver from an already boxed deleter.
    #[must_use]
    pub fn with_boxed_deleter(config: ResolverConfig, deleter: Box<dyn Deleter>) -> Self {
        let hasher = Hasher::new(config.algorithm);
        Self {
            config,
            hasher,
            deleter,
        }
    }

    /// Create a resolver that deletes duplicates permanently.
    #[must_use]
    pub fn permanent(config: ResolverConfig) -> Self {
        Self::new(config, PermanentDeleter)
    }

    /// Resolver with default configuration and permanent deletion.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::permanent(ResolverConfig::default())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether this resolver leaves files in place.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.deleter.is_dry_run()
    }

    /// List, fingerprint and group `dir` without deleting anything.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::DirectoryRead`] if the directory cannot be listed
    /// - [`ResolveError::Open`] / [`ResolveError::Read`] for the first file
    ///   that cannot be fingerprinted; later files are not visited
    pub fn plan(&self, dir: &Path) -> Result<DuplicatePlan, ResolveError> {
        self.phase_start(Phase::Listing, 0, dir);
        let entries = list_directory(dir, self.config.order).map_err(|e| self.fail(e.into()))?;
        self.phase_end(Phase::Listing);

        self.phase_start(Phase::Fingerprinting, entries.len(), dir);
        let mut grouper = Grouper::new();
        for (i, entry) in entries.iter().enumerate() {
            let hashed = self
                .hasher
                .hash_file(&entry.path)
                .map_err(|e| self.fail(e.into()))?;

            match grouper.observe(hashed.fingerprint, &entry.path, hashed.size) {
                Observation::Original => {
                    log::info!("New file: {}", entry.path.display());
                }
                Observation::Duplicate { original } => {
                    log::info!(
                        "Found duplicate file: {} (same content as {})",
                        entry.path.display(),
                        original.display()
                    );
                }
            }

            if let Some(cb) = &self.config.progress_callback {
                cb.on_progress(i + 1, &entry.path.to_string_lossy());
                cb.on_item_completed(hashed.size);
            }
        }
        self.phase_end(Phase::Fingerprinting);

        self.phase_start(Phase::Grouping, 0, dir);
        let (originals, groups) = grouper.finish();
        log::debug!(
            "{}: {} file(s), {} distinct, {} duplicate(s) in {} group(s)",
            dir.display(),
            entries.len(),
            originals.len(),
            groups.duplicate_count(),
            groups.len()
        );
        self.phase_end(Phase::Grouping);

        Ok(DuplicatePlan {
            directory: dir.to_path_buf(),
            files_scanned: entries.len(),
            originals,
            groups,
        })
    }

    /// Delete every duplicate listed in `plan`.
    ///
    /// Groups are processed in plan order and paths in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Delete`] for the first path that cannot be
    /// removed. Nothing already deleted is restored.
    pub fn apply(&self, plan: DuplicatePlan) -> Result<Resolution, ResolveError> {
        let dry_run = self.deleter.is_dry_run();
        let total = plan.groups.duplicate_count();
        self.phase_start(Phase::Deleting, total, &plan.directory);

        let mut deleted = Vec::with_capacity(total);
        let mut bytes_reclaimed = 0u64;
        for group in &plan.groups {
            log::info!(
                "Hash {}: keeping {}",
                group.fingerprint,
                group.original.display()
            );
            for path in &group.duplicates {
                self.deleter.delete(path).map_err(|source| {
                    self.fail(ResolveError::Delete {
                        path: path.clone(),
                        source,
                    })
                })?;

                if dry_run {
                    log::info!("Would delete {}", path.display());
                } else {
                    log::info!("Deleted {}", path.display());
                }
                deleted.push(path.clone());
                bytes_reclaimed += group.size;

                if let Some(cb) = &self.config.progress_callback {
                    cb.on_progress(deleted.len(), &path.to_string_lossy());
                }
            }
        }
        self.phase_end(Phase::Deleting);
        log::debug!("{}: {}", plan.directory.display(), Phase::Done);

        Ok(Resolution {
            directory: plan.directory,
            files_scanned: plan.files_scanned,
            originals: plan.originals,
            groups: plan.groups,
            deleted,
            bytes_reclaimed,
            dry_run,
        })
    }

    /// Resolve duplicates in `dir`: [`plan`](Self::plan) then [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Any error from either step; see their documentation.
    pub fn resolve(&self, dir: &Path) -> Result<Resolution, ResolveError> {
        let plan = self.plan(dir)?;
        self.apply(plan)
    }

    fn phase_start(&self, phase: Phase, total: usize, dir: &Path) {
        log::debug!("{}: {} ({} item(s))", dir.display(), phase, total);
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_start(phase.as_str(), total);
        }
    }

    fn phase_end(&self, phase: Phase) {
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_end(phase.as_str());
        }
    }

    fn fail(&self, err: ResolveError) -> ResolveError {
        log::error!("{} failed: {}", err.phase(), err);
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_end(err.phase().as_str());
            cb.on_message(Phase::Failed.as_str());
        }
        err
    }
}

/// Resolve duplicates in `dir` with default settings and permanent deletion.
///
/// # Errors
///
/// See [`DuplicateResolver::resolve`].
pub fn resolve_duplicates(dir: &Path) -> Result<Resolution, ResolveError> {
    DuplicateResolver::with_defaults().resolve(dir)
}
