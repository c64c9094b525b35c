mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use icsmerge_core::merge::{self, MergeRequest};
use icsmerge_core::report;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "icsmerge")]
#[command(about = "Reconcile two iCalendar snapshots into a merged output calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a new snapshot against the previous one and write the output calendar
    Merge {
        /// New snapshot .ics file (falls back to the last-used path)
        new: Option<PathBuf>,

        /// Previous snapshot .ics file (falls back to the last-used path)
        #[arg(short, long)]
        previous: Option<PathBuf>,

        /// Exclusion pattern file, one substring per line
        #[arg(short, long)]
        exclusions: Option<PathBuf>,

        /// Convert output events to all-day (date-only)
        #[arg(long)]
        all_day: bool,

        /// Where to write the merged calendar (default: <data dir>/icsmerge/out.ics)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat this as a first run, ignoring any remembered previous snapshot
        #[arg(long, conflicts_with = "previous")]
        first_run: bool,

        /// Do not remember these paths for the next run
        #[arg(long)]
        no_remember: bool,
    },
    /// Inspect the snapshots and exclusion list without merging
    Analyze {
        /// New snapshot .ics file (falls back to the last-used path)
        new: Option<PathBuf>,

        /// Previous snapshot .ics file (falls back to the last-used path)
        #[arg(short, long)]
        previous: Option<PathBuf>,

        /// Exclusion pattern file, one substring per line
        #[arg(short, long)]
        exclusions: Option<PathBuf>,
    },
    /// Show the remembered configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            new,
            previous,
            exclusions,
            all_day,
            output,
            first_run,
            no_remember,
        } => cmd_merge(new, previous, exclusions, all_day, output, first_run, no_remember),
        Commands::Analyze {
            new,
            previous,
            exclusions,
        } => cmd_analyze(new, previous, exclusions),
        Commands::Config => cmd_config(),
    }
}

fn cmd_merge(
    new: Option<PathBuf>,
    previous: Option<PathBuf>,
    exclusions: Option<PathBuf>,
    all_day: bool,
    output: Option<PathBuf>,
    first_run: bool,
    no_remember: bool,
) -> Result<()> {
    let mut cfg = config::load_config()?;

    let new = new.or_else(|| cfg.new.clone()).ok_or_else(|| {
        anyhow::anyhow!(
            "No new snapshot provided and none remembered.\n\
            Pass a path: icsmerge merge <new.ics>"
        )
    })?;
    let previous = if first_run {
        None
    } else {
        previous.or_else(|| cfg.previous.clone())
    };
    let exclusions = exclusions.or_else(|| cfg.exclusions.clone());
    let all_day = all_day || cfg.all_day;

    check_exists(&new)?;
    if let Some(ref path) = previous {
        check_exists(path)?;
    }
    if let Some(ref path) = exclusions {
        check_exists(path)?;
    }

    let request = MergeRequest {
        previous: previous.as_deref(),
        new: &new,
        exclusions: exclusions.as_deref(),
        all_day,
        keep_blank_exclusions: false,
    };
    let outcome = merge::run(&request)?;

    for warning in &outcome.warnings {
        eprintln!("{} {}", "warning:".yellow(), warning);
    }

    print_section("Exclusions", &outcome.reports.exclusions);
    print_section("Suggested removals", &outcome.reports.removals);
    print_section("New events", &outcome.reports.new_events);

    let output_path = match output {
        Some(path) => path,
        None => config::default_output_path()?,
    };
    std::fs::write(&output_path, &outcome.ics)
        .with_context(|| format!("Failed to write output calendar to {}", output_path.display()))?;

    println!(
        "\nWrote {} event(s) to {}",
        outcome.reconciliation.newly_added.len(),
        output_path.display()
    );

    if !no_remember {
        cfg.previous = previous;
        cfg.new = Some(new);
        cfg.exclusions = exclusions;
        cfg.all_day = all_day;
        config::save_config(&cfg)?;
    }

    Ok(())
}

fn cmd_analyze(
    new: Option<PathBuf>,
    previous: Option<PathBuf>,
    exclusions: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::load_config()?;

    let new = new.or_else(|| cfg.new.clone()).ok_or_else(|| {
        anyhow::anyhow!(
            "No new snapshot provided and none remembered.\n\
            Pass a path: icsmerge analyze <new.ics>"
        )
    })?;
    let previous = previous.or_else(|| cfg.previous.clone());
    let exclusions = exclusions.or_else(|| cfg.exclusions.clone());

    check_exists(&new)?;
    if let Some(ref path) = previous {
        check_exists(path)?;
    }
    if let Some(ref path) = exclusions {
        check_exists(path)?;
    }

    let request = MergeRequest {
        previous: previous.as_deref(),
        new: &new,
        exclusions: exclusions.as_deref(),
        all_day: false,
        keep_blank_exclusions: false,
    };
    let analysis = merge::analyze(&request)?;

    println!("{}", "Analysis".bold());
    println!("{}", report::analysis_report(&analysis));

    Ok(())
}

fn cmd_config() -> Result<()> {
    let path = config::config_path()?;

    if !path.exists() {
        println!("No configuration saved yet ({}).", path.display());
        println!("Run `icsmerge merge <new.ics>` to create one.");
        return Ok(());
    }

    let cfg = config::load_config()?;
    println!("{} {}", "Config file:".bold(), path.display());
    println!();
    print_path("previous", cfg.previous.as_deref());
    print_path("new", cfg.new.as_deref());
    print_path("exclusions", cfg.exclusions.as_deref());
    println!("  all_day    = {}", cfg.all_day);

    Ok(())
}

fn print_path(name: &str, path: Option<&Path>) {
    match path {
        Some(path) => println!("  {:<10} = {}", name, path.display()),
        None => println!("  {:<10} = {}", name, "(not set)".dimmed()),
    }
}

fn print_section(title: &str, body: &str) {
    println!("{}", title.bold());
    println!("{}", body);
}

fn check_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(())
}
