//! Cutin CLI - Command-line tool for Cutin texture archives.
//!
//! This is the main entry point for the Cutin command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cutin::batch;
use cutin::prelude::*;

/// Cutin - texture archive extraction and packing tool
#[derive(Parser)]
#[command(name = "cutin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of worker threads for batch commands (default: one per CPU)
    #[arg(short, long, global = true, env = "CUTIN_JOBS")]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every archive (*.00?) under a directory to .dds images
    Unpack {
        /// Source directory
        #[arg(env = "CUTIN_SRC")]
        src: PathBuf,

        /// Output directory
        #[arg(env = "CUTIN_DST")]
        dst: PathBuf,
    },

    /// Pack grouped .dds images (name-N.dds) under a directory into archives
    Pack {
        /// Source directory
        #[arg(env = "CUTIN_SRC")]
        src: PathBuf,

        /// Output directory
        #[arg(env = "CUTIN_DST")]
        dst: PathBuf,
    },

    /// List the items of a single archive
    List {
        /// Archive file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    match cli.command {
        Commands::Unpack { src, dst } => {
            cmd_unpack(&src, &dst)?;
        }
        Commands::Pack { src, dst } => {
            cmd_pack(&src, &dst)?;
        }
        Commands::List { input } => {
            cmd_list(&input)?;
        }
    }

    Ok(())
}

fn cmd_unpack(src: &Path, dst: &Path) -> Result<()> {
    if !prepare_dirs(src, dst)? {
        return Ok(());
    }

    println!("Extracting archives from {}", src.display());

    let pb = progress_bar()?;
    let start = Instant::now();
    let report = batch::unpack_all(src, dst, |progress| report_task(&pb, "Extracted", progress))?;

    pb.finish_with_message("Done");
    print_report("Unpacked", &report, start);

    Ok(())
}

fn cmd_pack(src: &Path, dst: &Path) -> Result<()> {
    if !prepare_dirs(src, dst)? {
        return Ok(());
    }

    println!("Packing images from {}", src.display());

    let pb = progress_bar()?;
    let start = Instant::now();
    let report = batch::pack_all(src, dst, |progress| report_task(&pb, "Packed", progress))?;

    pb.finish_with_message("Done");
    print_report("Packed", &report, start);

    Ok(())
}

fn cmd_list(input: &Path) -> Result<()> {
    let file = fs::read(input).context("Failed to read archive")?;
    let items = read_directory(&file).context("Failed to read archive directory")?;

    println!("{:>6} {:>12} {:>12}", "id", "stored", "original");
    for item in &items {
        let original = if glh::is_glh(item.data) {
            GlhHeader::parse(item.data)
                .map(|h| h.original_size.get().to_string())
                .unwrap_or_else(|_| "?".to_string())
        } else {
            "-".to_string()
        };

        println!("{:>6} {:>12} {:>12}", item.id, item.data.len(), original);
    }

    println!("\nTotal: {} items", items.len());

    Ok(())
}

/// Check the source directory and create the destination.
///
/// A missing source is reported and ends the command early without failing.
fn prepare_dirs(src: &Path, dst: &Path) -> Result<bool> {
    if !src.is_dir() {
        println!("Directory not found: {}", src.display());
        return Ok(false);
    }

    fs::create_dir_all(dst).context("Failed to create output directory")?;
    Ok(true)
}

fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Advance the bar and print a line on stdout for a finished task.
fn report_task(pb: &ProgressBar, verb: &str, progress: TaskProgress<'_>) {
    pb.set_length(progress.total as u64);
    pb.set_position(progress.completed as u64);

    if let Some(line) = task_line(verb, &progress) {
        pb.suspend(|| println!("{line}"));
    }
}

/// Per-file line for a finished task. Failures are listed in the summary.
fn task_line(verb: &str, progress: &TaskProgress<'_>) -> Option<String> {
    progress
        .succeeded
        .then(|| format!("{} {}", verb, display_name(progress.path)))
}

fn print_report(verb: &str, report: &BatchReport, start: Instant) {
    for failure in &report.failures {
        eprintln!("Error: {}", failure.error);
    }

    println!(
        "{} {} archives in {:?} ({} errors)",
        verb,
        report.succeeded,
        start.elapsed(),
        report.failed()
    );
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
