//! Human-readable summaries.
//!
//! Colors come from yansi and are switched off globally by `--no-color`
//! (see [`crate::run_app`]).

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::Resolution;
use crate::organize::{FolderStatus, OrganizeSummary, RunReport};

/// Write the summary of one directory pass.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_resolution<W: Write>(writer: &mut W, resolution: &Resolution) -> io::Result<()> {
    writeln!(
        writer,
        "{} {}",
        "Directory:".bold(),
        resolution.directory.display()
    )?;
    writeln!(writer, "  Files scanned:    {}", resolution.files_scanned)?;
    writeln!(writer, "  Duplicate groups: {}", resolution.groups.len())?;

    for group in &resolution.groups {
        writeln!(
            writer,
            "  {} {} ({})",
            "keep".green(),
            group.original.display(),
            ByteSize::b(group.size)
        )?;
        for duplicate in &group.duplicates {
            writeln!(writer, "    {} {}", "dup".red(), duplicate.display())?;
        }
    }

    let verb = if resolution.dry_run {
        "Would delete"
    } else {
        "Deleted"
    };
    writeln!(
        writer,
        "  {}: {} file(s), {} reclaimed",
        verb.bold(),
        resolution.deleted.len(),
        ByteSize::b(resolution.bytes_reclaimed)
    )
}

/// Write the result of the move step.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_organize_summary<W: Write>(
    writer: &mut W,
    summary: &OrganizeSummary,
) -> io::Result<()> {
    for moved in &summary.moved {
        writeln!(
            writer,
            "  {} {} -> {}",
            "moved".green(),
            moved.from.display(),
            moved.category
        )?;
    }
    for skipped in &summary.skipped {
        writeln!(
            writer,
            "  {} {} (target exists)",
            "skip".yellow(),
            skipped.display()
        )?;
    }
    for (path, error) in &summary.failed {
        writeln!(writer, "  {} {}: {}", "fail".red(), path.display(), error)?;
    }
    writeln!(
        writer,
        "{} {} moved, {} skipped, {} failed",
        "Organized:".bold(),
        summary.moved.len(),
        summary.skipped.len(),
        summary.failed.len()
    )
}

/// Write the report of a full run.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_run_report<W: Write>(writer: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(writer, "{} {}", "Base:".bold(), report.base_dir.display())?;
    write_organize_summary(writer, &report.organize)?;

    for outcome in &report.folders {
        match &outcome.status {
            FolderStatus::Resolved(resolution) => {
                let verb = if resolution.dry_run { "would remove" } else { "removed" };
                writeln!(
                    writer,
                    "  {:<10} {} {} {} duplicate(s), {}",
                    outcome.category,
                    "ok".green(),
                    verb,
                    resolution.deleted.len(),
                    ByteSize::b(resolution.bytes_reclaimed)
                )?;
            }
            FolderStatus::Missing => {
                writeln!(writer, "  {:<10} {}", outcome.category, "missing".dim())?;
            }
            FolderStatus::Failed(e) => {
                writeln!(writer, "  {:<10} {} {}", outcome.category, "failed".red(), e)?;
            }
            FolderStatus::Skipped => {
                writeln!(writer, "  {:<10} {}", outcome.category, "skipped".yellow())?;
            }
        }
    }

    writeln!(
        writer,
        "{} {} duplicate(s), {} reclaimed",
        "Total:".bold(),
        report.duplicates_removed(),
        ByteSize::b(report.bytes_reclaimed())
    )?;
    if report.interrupted {
        writeln!(writer, "{}", "Interrupted before all folders were processed.".yellow())?;
    }
    Ok(())
}
