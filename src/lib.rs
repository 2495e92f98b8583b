//! dlsort - Downloads Sorter
//!
//! Moves files from a downloads folder into category folders by extension,
//! then removes duplicate files inside each folder by comparing SHA-256
//! content fingerprints. The first file listed for each fingerprint is kept.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod organize;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};

use crate::actions::{deleter_for, DeleteMode};
use crate::cli::{
    Cli, Commands, DedupeArgs, DedupeOptions, HashArgs, InitConfigArgs, OrganizeArgs,
    OutputFormat, RunArgs,
};
use crate::config::{Config, ConfigError};
use crate::duplicates::{DuplicateResolver, ResolverConfig};
use crate::error::ExitCode;
use crate::organize::{Organizer, RunReport};
use crate::output::{JsonOutput, JsonRunReport};
use crate::progress::Progress;
use crate::scanner::Hasher;

/// Execute a parsed command line and return the process exit code.
///
/// # Errors
///
/// Returns an error when the configuration is invalid, the base directory
/// cannot be prepared, a single-directory pass aborts, or output fails.
/// Per-file and per-folder failures of a full run are reported through
/// [`ExitCode::PartialSuccess`] instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config =
        Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    let quiet = cli.quiet;
    match cli.command {
        Commands::Run(args) => handle_run(&config, args, quiet),
        Commands::Organize(args) => handle_organize(&config, args),
        Commands::Dedupe(args) => handle_dedupe(&config, args, quiet),
        Commands::Hash(args) => handle_hash(&config, args),
        Commands::InitConfig(args) => handle_init_config(cli.config.as_deref(), args),
    }
}

fn handle_run(config: &Config, args: RunArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let categories = config.category_config(args.base_dir.as_deref())?;
    let resolver = build_resolver(config, &args.dedupe, quiet);

    let handler = signal::install_handler().context("Failed to install Ctrl+C handler")?;
    let organizer = Organizer::new(categories).with_shutdown_flag(handler.get_flag());

    log::info!(
        "Organizing {} ({})",
        organizer.config().base_dir.display(),
        if resolver.is_dry_run() { "dry run" } else { "live" }
    );

    let report = organizer
        .run(&resolver)
        .with_context(|| format!("Failed to organize {}", organizer.config().base_dir.display()))?;

    let exit_code = if report.interrupted {
        ExitCode::Interrupted
    } else if report.has_failures() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    };

    write_run_report(&report, args.dedupe.output, exit_code)?;
    Ok(exit_code)
}

fn handle_organize(config: &Config, args: OrganizeArgs) -> anyhow::Result<ExitCode> {
    let organizer = Organizer::new(config.category_config(args.base_dir.as_deref())?);
    let base_dir = organizer.config().base_dir.clone();

    organizer
        .ensure_folders()
        .with_context(|| format!("Failed to prepare {}", base_dir.display()))?;
    let summary = organizer
        .organize()
        .with_context(|| format!("Failed to organize {}", base_dir.display()))?;

    let exit_code = if summary.failed.is_empty() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    };

    let report = RunReport {
        base_dir,
        organize: summary,
        folders: Vec::new(),
        interrupted: false,
    };

    match args.output {
        OutputFormat::Text => {
            let mut stdout = io::stdout().lock();
            output::write_organize_summary(&mut stdout, &report.organize)?;
        }
        OutputFormat::Json => write_run_report(&report, OutputFormat::Json, exit_code)?,
    }
    Ok(exit_code)
}

fn handle_dedupe(config: &Config, args: DedupeArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let resolver = build_resolver(config, &args.dedupe, quiet);
    let resolution = resolver
        .resolve(&args.path)
        .with_context(|| format!("Duplicate removal failed in {}", args.path.display()))?;

    let exit_code = if resolution.groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    let mut stdout = io::stdout().lock();
    match args.dedupe.output {
        OutputFormat::Text => output::write_resolution(&mut stdout, &resolution)?,
        OutputFormat::Json => JsonOutput::new(&resolution, exit_code).write_to(&mut stdout)?,
    }
    Ok(exit_code)
}

fn handle_hash(config: &Config, args: HashArgs) -> anyhow::Result<ExitCode> {
    let hasher = Hasher::new(args.algorithm.unwrap_or(config.algorithm));
    let mut stdout = io::stdout().lock();

    for path in &args.files {
        let fingerprint = hasher.fingerprint(path)?;
        writeln!(stdout, "{}  {}", fingerprint, path.display())?;
    }
    Ok(ExitCode::Success)
}

fn handle_init_config(path: Option<&Path>, args: InitConfigArgs) -> anyhow::Result<ExitCode> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    if path.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    log::info!("Wrote default configuration to {}", path.display());
    println!("{}", path.display());
    Ok(ExitCode::Success)
}

/// Resolver for the configured order, algorithm and delete mode, with CLI
/// flags taking precedence.
fn build_resolver(config: &Config, options: &DedupeOptions, quiet: bool) -> DuplicateResolver {
    let mut resolver_config = ResolverConfig::default()
        .with_order(options.order.unwrap_or(config.listing_order))
        .with_algorithm(options.algorithm.unwrap_or(config.algorithm));

    if !quiet {
        resolver_config = resolver_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let mode = if options.trash {
        DeleteMode::Trash
    } else {
        config.delete_mode
    };
    log::debug!(
        "Resolver: order={}, algorithm={}, mode={}, dry_run={}",
        resolver_config.order,
        resolver_config.algorithm,
        mode,
        options.dry_run
    );

    DuplicateResolver::with_boxed_deleter(resolver_config, deleter_for(mode, options.dry_run))
}

fn write_run_report(
    report: &RunReport,
    format: OutputFormat,
    exit_code: ExitCode,
) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => output::write_run_report(&mut stdout, report)?,
        OutputFormat::Json => JsonRunReport::new(report, exit_code).write_to(&mut stdout)?,
    }
    Ok(())
}
