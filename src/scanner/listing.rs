//! Single-level directory listing.
//!
//! # Overview
//!
//! [`list_directory`] enumerates the direct entries of one directory and
//! returns every non-directory entry as a [`FileEntry`]. Subdirectories are
//! skipped, never descended into. A symlink counts as a directory only when
//! its target is one; broken symlinks are returned like regular files so
//! that the caller sees them fail when opened.
//!
//! The order of the returned entries is chosen by [`ListingOrder`]. With
//! [`ListingOrder::Native`] it is whatever the operating system hands back,
//! which is not stable across platforms or filesystems.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use super::{FileEntry, ListingOrder, ScanError};

/// List the non-directory entries directly inside `dir`.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryRead`] if `dir` is missing, is not a
/// directory, or cannot be enumerated.
pub fn list_directory(dir: &Path, order: ListingOrder) -> Result<Vec<FileEntry>, ScanError> {
    let metadata = fs::metadata(dir).map_err(|source| ScanError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::DirectoryRead {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    let mut entries = Vec::new();
    for result in walker {
        let entry = result.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            ScanError::DirectoryRead {
                path,
                source: err.into(),
            }
        })?;

        let is_symlink = entry.path_is_symlink();
        let is_dir = if is_symlink {
            fs::metadata(entry.path()).is_ok_and(|m| m.is_dir())
        } else {
            entry.file_type().is_dir()
        };
        if is_dir {
            log::debug!("Skipping subdirectory {}", entry.path().display());
            continue;
        }

        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
        let mut file = FileEntry::new(entry.into_path(), modified);
        file.is_symlink = is_symlink;
        entries.push(file);
    }

    sort_entries(&mut entries, order);
    log::debug!(
        "Listed {} file(s) in {} ({} order)",
        entries.len(),
        dir.display(),
        order
    );
    Ok(entries)
}

/// Reorder entries in place according to `order`.
pub fn sort_entries(entries: &mut [FileEntry], order: ListingOrder) {
    match order {
        ListingOrder::Native => {}
        ListingOrder::Name => entries.sort_by(|a, b| a.file_name().cmp(b.file_name())),
        // Entries without a readable mtime go last.
        ListingOrder::Modified => entries.sort_by(|a, b| {
            (a.modified.is_none(), a.modified, a.file_name())
                .cmp(&(b.modified.is_none(), b.modified, b.file_name()))
        }),
    }
}
