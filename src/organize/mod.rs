//! Downloads categorization.
//!
//! This module provides functionality for:
//! - Mapping file extensions to category folders ([`categories`])
//! - Moving files into those folders and deduplicating each one ([`organizer`])
//!
//! The duplicate engine in [`crate::duplicates`] knows nothing about
//! categories; this module feeds it one populated folder at a time.

pub mod categories;
pub mod organizer;

pub use categories::{
    default_categories, normalize_extension, Category, CategoryConfig, CategoryError,
    DEFAULT_FALLBACK,
};
pub use organizer::{
    FolderOutcome, FolderStatus, MovedFile, OrganizeError, OrganizeSummary, Organizer, RunReport,
};
