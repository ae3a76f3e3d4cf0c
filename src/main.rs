//! Converts ADNI DICOM downloads into a BIDS dataset with dcm2niix.
//!
//! Acquisition directories are classified by name, converted one at a time, and
//! the resulting tree can be counted and have its letter-suffixed runs renumbered.
mod census;
mod config;
mod converter;
mod executor;
mod inspect;
mod issues;
mod logging;
mod mapping;
mod planner;
mod processor;
mod sessions;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_runtime_config, merge_config, CliOverrides, EffectiveConfig, DEFAULT_CONFIG_PATH};
use crate::converter::Dcm2niix;
use crate::executor::{execute_renames, RenameMode};
use crate::mapping::CategoryMapping;
use crate::processor::{write_reports, BidsConverter};

#[derive(Parser)]
#[command(name = "adni_bids_cli")]
#[command(about = "ADNI DICOM to BIDS converter", long_about = None)]
/// Entry CLI that dispatches to subcommands.
struct Cli {
    /// Optional runtime config in TOML that supplies defaults for the CLI.
    #[arg(short, long, help = "TOML config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert subjects with dcm2niix
    Convert(ConvertArgs),
    /// Count converted files per category
    Census(CensusArgs),
    /// Scan a BIDS tree for letter-suffixed runs and write the issues file
    DetectNaming(DetectArgs),
    /// Renumber letter-suffixed runs listed in the issues file
    FixNaming(FixArgs),
    /// Print protocol tags of the first DICOM file in each directory
    Inspect(InspectArgs),
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Root directory containing ADNI subject directories.
    dicom_root: PathBuf,

    /// Output directory for the BIDS dataset.
    output_root: PathBuf,

    /// Convert only this subject (e.g., 027_S_6512).
    #[arg(long)]
    subject: Option<String>,

    /// Only print the acquisition-directory index, don't convert.
    #[arg(long)]
    index_only: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// dcm2niix executable.
    #[arg(long, value_name = "PATH")]
    dcm2niix: Option<String>,

    /// Kill a dcm2niix call after this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Optional destination for the CSV conversion report.
    #[arg(long)]
    report_csv: Option<PathBuf>,

    /// Optional destination for the JSON conversion report.
    #[arg(long)]
    report_json: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct CensusArgs {
    /// BIDS dataset root.
    output_root: PathBuf,
}

#[derive(Args, Clone)]
struct DetectArgs {
    /// BIDS dataset root.
    output_root: PathBuf,

    /// Where to write the issues JSON.
    #[arg(long)]
    issues: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct FixArgs {
    /// Issues JSON produced by `detect-naming`.
    #[arg(long)]
    issues: Option<PathBuf>,

    /// Where to write the human-readable rename plan.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Apply without asking for confirmation.
    #[arg(short, long)]
    yes: bool,

    /// Number of entries shown in the preview and error summary.
    #[arg(long, value_name = "N")]
    preview: Option<usize>,
}

#[derive(Args, Clone)]
struct InspectArgs {
    /// Acquisition or timestamp directories to look into.
    #[arg(required = true)]
    dirs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    let cfg_path = args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let runtime_file = load_runtime_config(Some(&cfg_path))?;

    match args.command {
        Commands::Convert(cmd) => {
            let overrides = CliOverrides {
                dcm2niix_path: cmd.dcm2niix.clone(),
                dcm2niix_timeout_secs: cmd.timeout,
                report_csv: cmd.report_csv.clone(),
                report_json: cmd.report_json.clone(),
                ..Default::default()
            };
            let effective = merge_config(&overrides, runtime_file);
            let _guard = logging::init_logger(&effective.log_file, cmd.verbose);
            run_convert(cmd, &effective).await
        }
        Commands::Census(cmd) => run_census(&cmd),
        Commands::DetectNaming(cmd) => {
            let overrides = CliOverrides {
                issues_file: cmd.issues.clone(),
                ..Default::default()
            };
            run_detect(&cmd, &merge_config(&overrides, runtime_file))
        }
        Commands::FixNaming(cmd) => {
            let overrides = CliOverrides {
                issues_file: cmd.issues.clone(),
                rename_plan_file: cmd.plan.clone(),
                preview_limit: cmd.preview,
                ..Default::default()
            };
            run_fix(&cmd, &merge_config(&overrides, runtime_file)).await
        }
        Commands::Inspect(cmd) => run_inspect(&cmd),
    }
}

async fn run_convert(args: ConvertArgs, effective: &EffectiveConfig) -> Result<ExitCode> {
    let dcm2niix = Dcm2niix::new(effective.dcm2niix_path.clone(), effective.dcm2niix_timeout);
    let converter = BidsConverter::new(
        &args.dicom_root,
        &args.output_root,
        dcm2niix,
        Some(effective.logs_dir.clone()),
    )?;

    if args.index_only {
        let subjects = converter.discover_subjects().await?;
        print_index(&converter, &subjects).await?;
        return Ok(ExitCode::SUCCESS);
    }

    for (category, key) in CategoryMapping::builtin().contradictions() {
        tracing::warn!("suffix table for {} lists {} under another category", category, key);
    }

    if !converter.dcm2niix.is_available() {
        tracing::warn!(
            "{} did not answer -h; conversions will likely fail",
            effective.dcm2niix_path
        );
    }

    if let Some(subject) = &args.subject {
        let result = converter.convert_subject(subject).await;
        return Ok(if result.succeeded() {
            println!("{} {} converted", "✓".green(), subject);
            ExitCode::SUCCESS
        } else {
            println!("{} {}: {}", "✗".red(), subject, result.reason.join("; "));
            ExitCode::from(1)
        });
    }

    let subjects = converter.discover_subjects().await?;
    print_index(&converter, &subjects).await?;
    let results = converter.convert_all(&subjects).await;
    write_reports(&effective.report_csv, &effective.report_json, &results)?;

    let ok = results.iter().filter(|r| r.succeeded()).count();
    println!("Summary: {} Success, {} Failed/Partial.", ok, results.len() - ok);
    Ok(if ok == results.len() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

async fn print_index(converter: &BidsConverter, subjects: &[String]) -> Result<()> {
    let index = converter.acquisition_index(subjects).await?;
    println!("Found {} unique acquisition directories:", index.len());
    for entry in index {
        let status = if entry.excluded {
            "-".dimmed()
        } else if entry.recognized {
            "✓".green()
        } else {
            "?".yellow()
        };
        println!(
            "  {} {}: {} subjects -> {}",
            status, entry.acquisition, entry.subjects, entry.classification
        );
    }
    Ok(())
}

fn run_census(args: &CensusArgs) -> Result<ExitCode> {
    let census = census::count_modalities(&args.output_root)?;
    print!("{}", census.render());
    Ok(ExitCode::SUCCESS)
}

fn run_detect(args: &DetectArgs, effective: &EffectiveConfig) -> Result<ExitCode> {
    let found = issues::detect_issues(&args.output_root, CategoryMapping::builtin())?;
    let file = issues::IssuesFile::from_issues(found);
    issues::write_issues(&effective.issues_file, &file)?;
    println!(
        "Naming issues: {} -> {}",
        file.stats,
        effective.issues_file.display()
    );
    Ok(ExitCode::SUCCESS)
}

async fn run_fix(args: &FixArgs, effective: &EffectiveConfig) -> Result<ExitCode> {
    println!("Loading naming issues data...");
    let loaded = issues::load_issues(&effective.issues_file)?;
    println!("Loaded issues for {} subjects", loaded.issues.len());

    println!("Planning renames...");
    let plan = planner::plan_renames(&loaded.issues);
    println!("Generated rename plan for {} files", plan.entries.len());
    for group in &plan.rejected {
        println!(
            "{} {}/{}/{} {} left unchanged: {}",
            "!".yellow(),
            group.subject,
            group.session,
            group.category,
            group.base_name,
            group.error
        );
    }

    planner::save_plan(&plan, &effective.rename_plan_file)?;
    println!("Rename plan saved to: {}", effective.rename_plan_file.display());

    let rule = "=".repeat(60);
    println!("\n{}", rule);
    println!("REVIEW THE RENAME PLAN BEFORE PROCEEDING!");
    println!("Check {} to see all planned renames", effective.rename_plan_file.display());
    println!("{}", rule);

    let limit = effective.preview_limit;
    if args.yes || confirm("\nDo you want to execute the renames? (y/N): ")? {
        println!("\nExecuting renames...");
        let outcome = execute_renames(&plan.entries, RenameMode::Apply, true).await;

        println!("\nRename complete!");
        println!("Successfully renamed: {} files", outcome.succeeded.to_string().green());
        println!("Errors: {} files", outcome.failed.to_string().red());
        if !outcome.errors.is_empty() {
            println!("\nErrors encountered:");
            for line in outcome.error_summary(limit) {
                println!("{}", line);
            }
        }
        return Ok(if outcome.failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    println!("\nDry run mode - showing first {} planned renames:", limit);
    let head = &plan.entries[..plan.entries.len().min(limit)];
    let outcome = execute_renames(head, RenameMode::Preview, false).await;
    for item in head {
        println!(
            "  [DRY-RUN] {}: {} -> {}",
            item.category, item.old_filename, item.new_filename
        );
    }
    println!("Would succeed: {}, would fail: {}", outcome.succeeded, outcome.failed);
    for line in outcome.error_summary(limit) {
        println!("{}", line);
    }
    println!("No files were actually renamed.");
    Ok(ExitCode::SUCCESS)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn run_inspect(args: &InspectArgs) -> Result<ExitCode> {
    let mut missing = 0;
    for dir in &args.dirs {
        match inspect_dir(dir) {
            Ok(()) => {}
            Err(e) => {
                eprintln!("{} {}: {:#}", "✗".red(), dir.display(), e);
                missing += 1;
            }
        }
    }
    Ok(if missing == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn inspect_dir(dir: &Path) -> Result<()> {
    let file = inspect::first_dicom_file(dir)
        .ok_or_else(|| anyhow!("no DICOM file found"))?;
    let tags = inspect::read_protocol_tags(&file)?;
    println!("\n=== {} ===", dir.display());
    println!("File: {}", tags.file.display());
    if let Some(name) = acquisition_name(dir) {
        let mapped = match mapping::classify(&name).target() {
            Some((category, suffix)) => format!("{}/{}", category, suffix),
            None => "excluded".to_string(),
        };
        println!("Mapping ({}): {}", name, mapped);
    }
    println!("ProtocolName: {}", tags.protocol_name);
    println!("SeriesDescription: {}", tags.series_description);
    println!("SequenceName: {}", tags.sequence_name);
    println!("PulseSequenceName: {}", tags.pulse_sequence_name);
    Ok(())
}

/// Acquisition directory name for an acquisition or timestamp directory.
fn acquisition_name(dir: &Path) -> Option<String> {
    let name = dir.file_name()?.to_str()?;
    if sessions::session_date(name).is_some() {
        return dir.parent()?.file_name()?.to_str().map(String::from);
    }
    Some(name.to_string())
}
