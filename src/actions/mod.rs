//! File actions module.
//!
//! This module provides the ways a confirmed duplicate can be removed:
//! - Permanent deletion (default)
//! - Move to the system trash
//! - Dry run (report only)
//!
//! ```no_run
//! use dlsort::actions::{deleter_for, DeleteMode, Deleter};
//! use std::path::Path;
//!
//! let deleter = deleter_for(DeleteMode::Trash, false);
//! deleter.delete(Path::new("/path/to/duplicate.txt")).unwrap();
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{deleter_for, DeleteMode, Deleter, DryRunDeleter, PermanentDeleter, TrashDeleter};
