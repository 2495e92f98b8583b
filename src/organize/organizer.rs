//! Moves downloads into category folders and cleans up each folder.
//!
//! # Overview
//!
//! A full run has three steps:
//!
//! 1. [`Organizer::ensure_folders`] creates every category folder
//! 2. [`Organizer::organize`] moves top-level files into them by extension
//! 3. [`Organizer::dedupe_all`] resolves duplicates once per category folder
//!
//! Failures are isolated per unit of work: a file that cannot be moved is
//! recorded and the next file is tried; a folder whose duplicate pass fails
//! is recorded and the next folder is processed.
//!
//! # Example
//!
//! ```no_run
//! use dlsort::duplicates::DuplicateResolver;
//! use dlsort::organize::{CategoryConfig, Organizer};
//! use std::path::PathBuf;
//!
//! let organizer = Organizer::new(CategoryConfig::with_defaults(PathBuf::from("/home/me/Downloads")));
//! let report = organizer.run(&DuplicateResolver::with_defaults()).unwrap();
//! println!("moved {} file(s)", report.organize.moved.len());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::categories::CategoryConfig;
use crate::duplicates::{DuplicateResolver, Resolution, ResolveError};
use crate::scanner::{list_directory, ListingOrder, ScanError};

/// Errors that stop organizing before any file is moved.
#[derive(thiserror::Error, Debug)]
pub enum OrganizeError {
    /// A category folder could not be created.
    #[error("cannot create folder {path}: {source}")]
    CreateFolder {
        /// Folder that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The base directory could not be listed.
    #[error(transparent)]
    ListBase(#[from] ScanError),
}

/// A file moved into a category folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    /// Original location
    pub from: PathBuf,
    /// New location
    pub to: PathBuf,
    /// Category that claimed it
    pub category: String,
}

/// Result of the move step.
#[derive(Debug, Default)]
pub struct OrganizeSummary {
    /// Files moved into a category folder
    pub moved: Vec<MovedFile>,
    /// Files left alone because the target name was taken
    pub skipped: Vec<PathBuf>,
    /// Files whose move failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// What happened to one category folder during deduplication.
#[derive(Debug)]
pub enum FolderStatus {
    /// The pass completed.
    Resolved(Resolution),
    /// The folder does not exist.
    Missing,
    /// The pass aborted with an error.
    Failed(ResolveError),
    /// Not processed because shutdown was requested.
    Skipped,
}

/// Deduplication outcome for one category folder.
#[derive(Debug)]
pub struct FolderOutcome {
    /// Category name
    pub category: String,
    /// Folder path
    pub folder: PathBuf,
    /// What happened
    pub status: FolderStatus,
}

/// Everything a full run did.
#[derive(Debug)]
pub struct RunReport {
    /// Directory that was organized
    pub base_dir: PathBuf,
    /// Result of the move step
    pub organize: OrganizeSummary,
    /// Per-folder deduplication outcomes, in processing order
    pub folders: Vec<FolderOutcome>,
    /// True if Ctrl+C stopped the run between folders
    pub interrupted: bool,
}

impl RunReport {
    /// Whether any move or folder pass failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.organize.failed.is_empty()
            || self
                .folders
                .iter()
                .any(|f| matches!(f.status, FolderStatus::Failed(_)))
    }

    /// Total duplicates removed (or, in a dry run, that would be removed).
    #[must_use]
    pub fn duplicates_removed(&self) -> usize {
        self.resolutions().map(|r| r.deleted.len()).sum()
    }

    /// Total bytes freed.
    #[must_use]
    pub fn bytes_reclaimed(&self) -> u64 {
        self.resolutions().map(|r| r.bytes_reclaimed).sum()
    }

    fn resolutions(&self) -> impl Iterator<Item = &Resolution> {
        self.folders.iter().filter_map(|f| match &f.status {
            FolderStatus::Resolved(r) => Some(r),
            _ => None,
        })
    }
}

/// Sorts a base directory into category folders.
#[derive(Debug)]
pub struct Organizer {
    config: CategoryConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Organizer {
    /// Create an organizer for the given category table.
    #[must_use]
    pub fn new(config: CategoryConfig) -> Self {
        Self {
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag, checked before each category folder.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Category table in use.
    #[must_use]
    pub fn config(&self) -> &CategoryConfig {
        &self.config
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Create the base directory and every category folder.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::CreateFolder`] for the first folder that
    /// cannot be created.
    pub fn ensure_folders(&self) -> Result<(), OrganizeError> {
        for name in self.config.folder_names() {
            let path = self.config.folder(name);
            fs::create_dir_all(&path)
                .map_err(|source| OrganizeError::CreateFolder { path, source })?;
        }
        Ok(())
    }

    /// Move every top-level file of the base directory into its category folder.
    ///
    /// Subdirectories (including the category folders) are not touched. An
    /// existing file at the target is never overwritten; the source is
    /// skipped instead.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::ListBase`] if the base directory cannot be
    /// listed. Failed moves are recorded in the summary, not returned.
    pub fn organize(&self) -> Result<OrganizeSummary, OrganizeError> {
        let entries = list_directory(&self.config.base_dir, ListingOrder::Name)?;
        let mut summary = OrganizeSummary::default();

        for entry in entries {
            let category = self.config.category_for(&entry.path).to_string();
            let target = self.config.folder(&category).join(entry.file_name());

            if fs::symlink_metadata(&target).is_ok() {
                log::warn!(
                    "Not moving {}: {} already exists",
                    entry.path.display(),
                    target.display()
                );
                summary.skipped.push(entry.path);
                continue;
            }

            match fs::rename(&entry.path, &target) {
                Ok(()) => {
                    log::info!("Moved {} -> {}", entry.path.display(), target.display());
                    summary.moved.push(MovedFile {
                        from: entry.path,
                        to: target,
                        category,
                    });
                }
                Err(e) => {
                    log::warn!("Failed to move {}: {}", entry.path.display(), e);
                    summary.failed.push((entry.path, e.to_string()));
                }
            }
        }

        log::info!(
            "Organized {}: {} moved, {} skipped, {} failed",
            self.config.base_dir.display(),
            summary.moved.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Resolve duplicates in every category folder, one folder at a time.
    ///
    /// A failing folder is logged and recorded; the next folder still runs.
    pub fn dedupe_all(&self, resolver: &DuplicateResolver) -> Vec<FolderOutcome> {
        let mut outcomes = Vec::new();

        for name in self.config.folder_names() {
            let folder = self.config.folder(name);
            let status = if self.is_shutdown_requested() {
                FolderStatus::Skipped
            } else if !folder.is_dir() {
                log::debug!("Skipping missing folder {}", folder.display());
                FolderStatus::Missing
            } else {
                dedupe_folder(resolver, name, &folder)
            };

            outcomes.push(FolderOutcome {
                category: name.to_string(),
                folder,
                status,
            });
        }

        outcomes
    }

    /// Create folders, move files, then deduplicate every folder.
    ///
    /// # Errors
    ///
    /// Returns an error only if folders cannot be created or the base
    /// directory cannot be listed.
    pub fn run(&self, resolver: &DuplicateResolver) -> Result<RunReport, OrganizeError> {
        self.ensure_folders()?;
        let organize = self.organize()?;
        let folders = self.dedupe_all(resolver);
        let interrupted = folders
            .iter()
            .any(|f| matches!(f.status, FolderStatus::Skipped));

        Ok(RunReport {
            base_dir: self.config.base_dir.clone(),
            organize,
            folders,
            interrupted,
        })
    }
}

fn dedupe_folder(resolver: &DuplicateResolver, name: &str, folder: &Path) -> FolderStatus {
    if let Some(cb) = &resolver.config().progress_callback {
        cb.on_message(name);
    }

    match resolver.resolve(folder) {
        Ok(resolution) => FolderStatus::Resolved(resolution),
        Err(e) => {
            log::error!(
                "Error while removing duplicates in {}: {}",
                folder.display(),
                e
            );
            FolderStatus::Failed(e)
        }
    }
}
