//! File deletion strategies for confirmed duplicates.
//!
//! # Overview
//!
//! Duplicate resolution removes files through the [`Deleter`] trait so the
//! caller decides how a path is removed:
//!
//! - [`PermanentDeleter`]: `std::fs::remove_file`, not recoverable (default)
//! - [`TrashDeleter`]: move to the system trash via the `trash` crate
//! - [`DryRunDeleter`]: remove nothing, only report
//!
//! Any `Fn(&Path) -> io::Result<()>` closure is a `Deleter` too, which is how
//! tests inject failures.
//!
//! # Example
//!
//! ```no_run
//! use dlsort::actions::{Deleter, PermanentDeleter};
//! use std::path::Path;
//!
//! PermanentDeleter.delete(Path::new("/path/to/duplicate.txt")).unwrap();
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Removes a single file by path.
pub trait Deleter {
    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying filesystem error; the file is left in place.
    fn delete(&self, path: &Path) -> io::Result<()>;

    /// Whether this deleter leaves files in place.
    fn is_dry_run(&self) -> bool {
        false
    }
}

impl<F> Deleter for F
where
    F: Fn(&Path) -> io::Result<()>,
{
    fn delete(&self, path: &Path) -> io::Result<()> {
        self(path)
    }
}

/// Deletes files for good.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermanentDeleter;

impl Deleter for PermanentDeleter {
    fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Moves files to the platform trash / recycle bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrashDeleter;

impl Deleter for TrashDeleter {
    fn delete(&self, path: &Path) -> io::Result<()> {
        // trash reports success for paths that don't exist on some platforms
        fs::symlink_metadata(path)?;
        trash::delete(path).map_err(|e| io::Error::other(e.to_string()))
    }
}

/// Leaves every file in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunDeleter;

impl Deleter for DryRunDeleter {
    fn delete(&self, path: &Path) -> io::Result<()> {
        log::debug!("Dry run: would delete {}", path.display());
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

/// How confirmed duplicates are removed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Remove with `std::fs::remove_file`.
    #[default]
    Permanent,
    /// Move to the system trash.
    Trash,
}

impl fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

/// Build the deleter for a mode; `dry_run` overrides the mode.
#[must_use]
pub fn deleter_for(mode: DeleteMode, dry_run: bool) -> Box<dyn Deleter> {
    if dry_run {
        return Box::new(DryRunDeleter);
    }
    match mode {
        DeleteMode::Permanent => Box::new(PermanentDeleter),
        DeleteMode::Trash => Box::new(TrashDeleter),
    }
}
