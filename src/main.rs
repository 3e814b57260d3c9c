//! rift - mirror a project tree into a destination.
//!
//! Usage:
//!   rift --to <DEST>                        Mirror the current directory into DEST/<dirname>
//!   rift --to <DEST> --name <NAME>          Mirror into DEST/NAME
//!   rift --to <DEST> --exclude '*.log'      Add exclusions on top of .gitignore
//!   rift --help                             Show help

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, OptionExt, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use rift_core::SyncConfig;
use rift_filter::PatternSet;
use rift_ops::{SyncReport, Synchronizer};

#[derive(Parser)]
#[command(
    name = "rift",
    version,
    about = "Sync project files to a destination",
    long_about = "rift mirrors the current project into <to>/<name>.\n\n\
                  `.git` and everything matched by the project's .gitignore are \
                  left out; files removed from the project are removed from the \
                  mirror. Unchanged files (same size and modification time) are \
                  not copied again.",
    after_help = "Examples:\n  \
                  rift --to /backup\n  \
                  rift --to /games/addons --name MyAddon\n  \
                  rift --to ~/projects-backup --exclude \"*.log\" --exclude \"tmp/\""
)]
struct Cli {
    /// Destination path; the mirror is created inside it
    #[arg(long = "to", value_name = "PATH")]
    to: PathBuf,

    /// Name for the destination folder (defaults to the source directory name)
    #[arg(long)]
    name: Option<String>,

    /// Additional pattern to exclude (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Directory to mirror (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Summary output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Log every copied, skipped and removed path
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(&cli);

    let source = match &cli.source {
        Some(path) => std::path::absolute(path).context("Invalid source path")?,
        None => std::env::current_dir().context("Getting working directory")?,
    };
    let destination = resolve_destination(&cli.to, cli.name.as_deref(), &source)?;

    let patterns = PatternSet::from_project(&source, cli.exclude.iter().cloned());
    tracing::debug!(
        patterns = ?patterns.patterns().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        "exclusion patterns"
    );
    let config = SyncConfig::builder()
        .source(&source)
        .destination(&destination)
        .exclude_patterns(
            patterns
                .patterns()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect::<Vec<_>>(),
        )
        .build()
        .context("Invalid configuration")?;

    let report = Synchronizer::with_patterns(config, patterns)
        .run()
        .context("Sync failed")?;

    match cli.format {
        OutputFormat::Text => print_report(&source, &destination, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

/// Compute `<to>/<name>`, where `name` defaults to the source's basename.
fn resolve_destination(to: &Path, name: Option<&str>, source: &Path) -> Result<PathBuf> {
    let name = match name {
        Some(name) if !name.is_empty() => name.to_string(),
        Some(_) => color_eyre::eyre::bail!("--name cannot be empty"),
        None => source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_eyre("Cannot derive a destination name from the source path; pass --name")?,
    };

    let to = std::path::absolute(to).context("Invalid destination path")?;
    Ok(to.join(name))
}

fn print_report(source: &Path, destination: &Path, report: &SyncReport) {
    println!("{} -> {}", source.display(), destination.display());
    println!(" {}", report.summary());
    if report.bytes_copied > 0 {
        println!(" {} written", format_size(report.bytes_copied));
    }
    if report.entries_excluded > 0 {
        println!(" {} entries excluded", report.entries_excluded);
    }
    println!(" Done in {:.2}s", report.duration.as_secs_f64());
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
