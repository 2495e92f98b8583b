//! Command-line interface definitions for dlsort.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Sort ~/Downloads into category folders and remove duplicates in each
//! dlsort run
//!
//! # Same, for another folder: files are still moved, duplicates only reported
//! dlsort run /mnt/inbox --dry-run
//!
//! # Remove duplicates in one folder, keeping the alphabetically first copy
//! dlsort dedupe ~/Downloads/Images --order name
//!
//! # Print content fingerprints
//! dlsort hash a.pdf b.pdf
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::scanner::{HashAlgorithm, ListingOrder};

/// Sort a downloads folder into category folders and remove duplicate files.
///
/// Files are moved by extension into folders such as Images, Documents and
/// Music. Inside each folder, files with identical content (same SHA-256
/// fingerprint) are reduced to one copy: the first one listed is kept.
#[derive(Debug, Parser)]
#[command(name = "dlsort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sort files into category folders, then remove duplicates in each folder
    Run(RunArgs),
    /// Sort files into category folders only
    Organize(OrganizeArgs),
    /// Remove duplicate files in a single directory
    Dedupe(DedupeArgs),
    /// Print the content fingerprint of files
    Hash(HashArgs),
    /// Write the default configuration file
    InitConfig(InitConfigArgs),
}

/// Arguments for the run subcommand.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory to organize (default: configured base_dir, else ~/Downloads)
    #[arg(value_name = "BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    #[command(flatten)]
    pub dedupe: DedupeOptions,
}

/// Arguments for the organize subcommand.
#[derive(Debug, Args)]
pub struct OrganizeArgs {
    /// Directory to organize (default: configured base_dir, else ~/Downloads)
    #[arg(value_name = "BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the dedupe subcommand.
#[derive(Debug, Args)]
pub struct DedupeArgs {
    /// Directory whose duplicates are removed (not recursive)
    #[arg(value_name = "DIR")]
    pub path: PathBuf,

    #[command(flatten)]
    pub dedupe: DedupeOptions,
}

/// Arguments for the hash subcommand.
#[derive(Debug, Args)]
pub struct HashArgs {
    /// Files to fingerprint
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Hash algorithm (default: from config, else sha256)
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,
}

/// Arguments for the init-config subcommand.
#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Options shared by every command that removes duplicates.
#[derive(Debug, Clone, Args)]
pub struct DedupeOptions {
    /// Which copy is kept: the first in this listing order
    #[arg(long, value_enum)]
    pub order: Option<ListingOrder>,

    /// Hash algorithm for fingerprints
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Report duplicates without deleting them (`run` still moves files)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Move duplicates to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
