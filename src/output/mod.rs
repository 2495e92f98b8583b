//! Output formatters for resolution and run reports.
//!
//! This module provides different output formats:
//! - Text for terminals ([`text`])
//! - JSON for automation and scripting ([`json`])
//!
//! # Example
//!
//! ```no_run
//! use dlsort::duplicates::resolve_duplicates;
//! use dlsort::output::text::write_resolution;
//! use std::path::Path;
//!
//! let resolution = resolve_duplicates(Path::new("/tmp/inbox")).unwrap();
//! write_resolution(&mut std::io::stdout(), &resolution).unwrap();
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError, JsonRunReport};
pub use text::{write_organize_summary, write_resolution, write_run_report};
