//! JSON output formatter for resolution and run reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! A single-directory pass (`dlsort dedupe DIR --output json`):
//!
//! ```json
//! {
//!   "generated_at": "2026-10-17T09:30:00Z",
//!   "directory": "/home/me/Downloads/Images",
//!   "algorithm": "sha256",
//!   "files_scanned": 12,
//!   "groups": [
//!     {
//!       "fingerprint": "2cf24dba...",
//!       "size": 1024,
//!       "original": "/home/me/Downloads/Images/a.png",
//!       "duplicates": ["/home/me/Downloads/Images/a (1).png"]
//!     }
//!   ],
//!   "deleted": ["/home/me/Downloads/Images/a (1).png"],
//!   "bytes_reclaimed": 1024,
//!   "dry_run": false,
//!   "exit_code": 0,
//!   "exit_code_name": "DS000"
//! }
//! ```
//!
//! A full run wraps one such object per category folder, next to the list of
//! moved, skipped and failed files.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, Resolution};
use crate::error::ExitCode;
use crate::organize::{FolderOutcome, FolderStatus, OrganizeSummary, RunReport};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Content fingerprint as 64 lowercase hex characters
    pub fingerprint: String,
    /// File size in bytes
    pub size: u64,
    /// The retained file
    pub original: String,
    /// Files with the same content, in listing order
    pub duplicates: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a [`DuplicateGroup`].
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            fingerprint: group.fingerprint.to_hex(),
            size: group.size,
            original: path_string(&group.original),
            duplicates: group.duplicates.iter().map(|p| path_string(p)).collect(),
        }
    }
}

/// One directory pass in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonResolution {
    /// Directory that was processed
    pub directory: String,
    /// Hash algorithm of every fingerprint below
    pub algorithm: String,
    /// Regular files fingerprinted
    pub files_scanned: usize,
    /// Duplicate groups, ordered by their first duplicate
    pub groups: Vec<JsonDuplicateGroup>,
    /// Files removed (or, in a dry run, that would be removed)
    pub deleted: Vec<String>,
    /// Bytes freed by the removals
    pub bytes_reclaimed: u64,
    /// Whether files were left in place
    pub dry_run: bool,
}

impl JsonResolution {
    /// Convert a [`Resolution`].
    #[must_use]
    pub fn from_resolution(resolution: &Resolution) -> Self {
        let algorithm = resolution
            .groups
            .iter()
            .next()
            .map(|g| g.fingerprint.algorithm())
            .or_else(|| resolution.originals.iter().next().map(|(fp, _)| fp.algorithm()))
            .map(|a| a.as_str().to_string())
            .unwrap_or_default();

        Self {
            directory: path_string(&resolution.directory),
            algorithm,
            files_scanned: resolution.files_scanned,
            groups: resolution
                .groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            deleted: resolution.deleted.iter().map(|p| path_string(p)).collect(),
            bytes_reclaimed: resolution.bytes_reclaimed,
            dry_run: resolution.dry_run,
        }
    }
}

/// Report for `dlsort dedupe`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// The pass itself
    #[serde(flatten)]
    pub resolution: JsonResolution,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonOutput {
    /// Create a report for one directory pass.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dlsort::duplicates::resolve_duplicates;
    /// use dlsort::error::ExitCode;
    /// use dlsort::output::json::JsonOutput;
    /// use std::path::Path;
    ///
    /// let resolution = resolve_duplicates(Path::new("/tmp/inbox")).unwrap();
    /// let output = JsonOutput::new(&resolution, ExitCode::Success);
    /// println!("{}", output.to_json_pretty().unwrap());
    /// ```
    #[must_use]
    pub fn new(resolution: &Resolution, exit_code: ExitCode) -> Self {
        Self {
            generated_at: Utc::now(),
            resolution: JsonResolution::from_resolution(resolution),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON and a trailing newline to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        write_json(writer, self)
    }
}

/// A moved file.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMove {
    /// Original location
    pub from: String,
    /// New location
    pub to: String,
    /// Category folder
    pub category: String,
}

/// A file that could not be moved.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// The file
    pub path: String,
    /// Why the move failed
    pub error: String,
}

/// Result of the move step.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOrganize {
    /// Files moved into a category folder
    pub moved: Vec<JsonMove>,
    /// Files left in place because the target name was taken
    pub skipped: Vec<String>,
    /// Files whose move failed
    pub failed: Vec<JsonFailure>,
}

impl JsonOrganize {
    /// Convert an [`OrganizeSummary`].
    #[must_use]
    pub fn from_summary(summary: &OrganizeSummary) -> Self {
        Self {
            moved: summary
                .moved
                .iter()
                .map(|m| JsonMove {
                    from: path_string(&m.from),
                    to: path_string(&m.to),
                    category: m.category.clone(),
                })
                .collect(),
            skipped: summary.skipped.iter().map(|p| path_string(p)).collect(),
            failed: summary
                .failed
                .iter()
                .map(|(path, error)| JsonFailure {
                    path: path_string(path),
                    error: error.clone(),
                })
                .collect(),
        }
    }
}

/// Deduplication outcome for one category folder.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFolder {
    /// Category name
    pub category: String,
    /// Folder path
    pub folder: String,
    /// One of "resolved", "missing", "failed", "skipped"
    pub status: &'static str,
    /// Error message for failed folders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Pass details for resolved folders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<JsonResolution>,
}

impl JsonFolder {
    /// Convert a [`FolderOutcome`].
    #[must_use]
    pub fn from_outcome(outcome: &FolderOutcome) -> Self {
        let (status, error, resolution) = match &outcome.status {
            FolderStatus::Resolved(r) => ("resolved", None, Some(JsonResolution::from_resolution(r))),
            FolderStatus::Missing => ("missing", None, None),
            FolderStatus::Failed(e) => ("failed", Some(e.to_string()), None),
            FolderStatus::Skipped => ("skipped", None, None),
        };
        Self {
            category: outcome.category.clone(),
            folder: path_string(&outcome.folder),
            status,
            error,
            resolution,
        }
    }
}

/// Report for `dlsort run` and `dlsort organize`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRunReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Directory that was organized
    pub base_dir: String,
    /// Result of the move step
    pub organize: JsonOrganize,
    /// Per-folder outcomes, empty for `dlsort organize`
    pub folders: Vec<JsonFolder>,
    /// Total duplicates removed
    pub duplicates_removed: usize,
    /// Total bytes freed
    pub bytes_reclaimed: u64,
    /// Whether Ctrl+C stopped the run
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name
    pub exit_code_name: String,
}

impl JsonRunReport {
    /// Create a report for a full run.
    #[must_use]
    pub fn new(report: &RunReport, exit_code: ExitCode) -> Self {
        Self {
            generated_at: Utc::now(),
            base_dir: path_string(&report.base_dir),
            organize: JsonOrganize::from_summary(&report.organize),
            folders: report.folders.iter().map(JsonFolder::from_outcome).collect(),
            duplicates_removed: report.duplicates_removed(),
            bytes_reclaimed: report.bytes_reclaimed(),
            interrupted: report.interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON and a trailing newline to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        write_json(writer, self)
    }
}

fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<(), JsonOutputError> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

// Deleted files cannot be canonicalized, so paths are reported as given.
fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
