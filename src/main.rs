use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use i18n_retrofit::{ApprovedChange, Rewriter, ScanQuery, SimpleFormatter};

/// Retrofit - Find hardcoded strings in Laravel views and replace them with translation calls
#[derive(Parser, Debug)]
#[command(name = "retrofit")]
#[command(author, version, about, long_about = None)]
#[command(help_template = "{name} {version}\n{about}\n\nUSAGE:\n    {usage}\n\n{all-args}")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log every scanned file and applied change to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan files or directories for hardcoded user-facing strings
    Scan {
        /// Files or directories to scan (default: current directory)
        #[arg(value_name = "PATHS")]
        paths: Vec<PathBuf>,

        /// Exclude directories whose path contains this segment (repeatable)
        #[arg(short, long = "exclude", value_name = "DIR")]
        exclude: Vec<String>,

        /// Exclude files by name or path (repeatable)
        #[arg(long = "exclude-file", value_name = "FILE")]
        exclude_file: Vec<String>,

        /// Only scan files matching this glob (repeatable)
        #[arg(short, long = "include", value_name = "GLOB")]
        include: Vec<String>,

        /// Do not add the detected project type's default excluded directories
        #[arg(long)]
        no_default_exclusions: bool,

        /// Settings file to use instead of .i18n-retrofit.json in the scanned directory
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Hide candidates scoring below this confidence (0-100)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=100))]
        min_confidence: Option<u8>,

        /// Also list skipped strings with their reasons
        #[arg(long)]
        show_skipped: bool,

        /// Print the keyed batch as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a batch of approved changes
    Apply {
        /// JSON file with approved changes
        #[arg(value_name = "CHANGES")]
        changes: PathBuf,

        /// Directory that change locations are relative to
        #[arg(long, value_name = "DIR")]
        base_dir: Option<PathBuf>,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether the command succeeded
fn run(cli: Cli) -> Result<bool> {
    let formatter =
        SimpleFormatter::new().with_color(colored::control::SHOULD_COLORIZE.should_colorize());

    match cli.command {
        Command::Scan {
            paths,
            exclude,
            exclude_file,
            include,
            no_default_exclusions,
            config,
            min_confidence,
            show_skipped,
            json,
        } => {
            let mut query = ScanQuery::new(paths)
                .with_exclusions(exclude)
                .with_excluded_files(exclude_file)
                .with_includes(include)
                .with_default_exclusions(!no_default_exclusions);
            if let Some(config) = config {
                query = query.with_config_file(config);
            }

            let settings = query.settings().context("failed to load scan settings")?;
            let result = i18n_retrofit::run_scan_with(&query, &settings)?;
            let floor = min_confidence.or(settings.min_confidence).unwrap_or(0);
            let keyed: Vec<_> = i18n_retrofit::analyze(&result.candidates)
                .into_iter()
                .filter(|k| k.confidence >= floor)
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&keyed)?);
                return Ok(true);
            }

            if result.is_empty() {
                println!("No hardcoded strings found");
                return Ok(true);
            }

            print!("{}", formatter.format_candidates(&keyed));
            if show_skipped {
                print!("{}", formatter.format_skipped(&result.skipped));
            }
            print!("{}", formatter.format_summary(&result, keyed.len()));
            Ok(true)
        }
        Command::Apply {
            changes,
            base_dir,
            dry_run,
        } => {
            let batch = ApprovedChange::load(&changes)
                .with_context(|| format!("failed to read {}", changes.display()))?;

            let mut rewriter = Rewriter::new().dry_run(dry_run);
            if let Some(dir) = base_dir {
                rewriter = rewriter.base_dir(dir);
            }
            let result = rewriter.apply(&batch);

            print!("{}", formatter.format_rewrite(&result));
            let ids = result.applied_ids();
            if !ids.is_empty() {
                println!("applied: {}", ids.join(", "));
            }
            if dry_run {
                println!("{}", "dry run: no files were written".dimmed());
            }
            Ok(result.success)
        }
    }
}
