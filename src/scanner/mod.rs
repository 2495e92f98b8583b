//! Scanner module for directory listing and content fingerprinting.
//!
//! This module provides functionality for:
//! - Single-level directory listing with an explicit entry order
//! - Streaming content fingerprints (SHA-256 or BLAKE3)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`listing`]: Direct entries of one directory, subdirectories skipped
//! - [`fingerprint`]: Full-content hashing
//!
//! # Example
//!
//! ```no_run
//! use dlsort::scanner::{fingerprint, list_directory, ListingOrder};
//! use std::path::Path;
//!
//! let files = list_directory(Path::new("Downloads/Images"), ListingOrder::Name).unwrap();
//! for file in files {
//!     match fingerprint(&file.path) {
//!         Ok(fp) => println!("{fp}  {}", file.path.display()),
//!         Err(e) => eprintln!("Warning: {e}"),
//!     }
//! }
//! ```

pub mod fingerprint;
pub mod listing;

use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use fingerprint::{
    fingerprint, Fingerprint, FingerprintError, HashAlgorithm, HashedFile, Hasher, DIGEST_LEN,
    READ_BUFFER_SIZE,
};
pub use listing::{list_directory, sort_entries};

/// A file found while listing a directory.
///
/// Lives only for the duration of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file (the listed directory joined with the entry name)
    pub path: PathBuf,
    /// Last modification time, if the filesystem reports one
    pub modified: Option<SystemTime>,
    /// Whether this entry is a symbolic link
    pub is_symlink: bool,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, modified: Option<SystemTime>) -> Self {
        Self {
            path,
            modified,
            is_symlink: false,
        }
    }

    /// Final path component, or an empty name for a bare root.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }
}

/// Order in which directory entries are visited.
///
/// The first file seen for a given fingerprint is the one kept, so this
/// setting decides which copy of a duplicate survives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ListingOrder {
    /// Whatever order the operating system returns.
    #[default]
    Native,
    /// Byte-wise order of the file name.
    Name,
    /// Oldest modification time first, ties broken by name.
    Modified,
}

impl fmt::Display for ListingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Name => write!(f, "name"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// Errors that can occur while listing a directory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The directory could not be enumerated (missing, not a directory, no permission).
    #[error("cannot read directory {path}: {source}")]
    DirectoryRead {
        /// Directory (or entry) where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
