use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use pbxpatch::{ident, validate, Registrar, RunConfig, RunFailure};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pbxpatch")]
#[command(about = "Safely register source files in an Xcode project.pbxproj", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a source file in the project manifest
    Add {
        /// Path to the project.pbxproj file
        #[arg(short, long)]
        project: PathBuf,

        /// Path to the source file being registered (must exist)
        #[arg(short, long)]
        file: PathBuf,

        /// Navigator group that owns the file
        #[arg(short, long)]
        group: String,

        /// Build target(s) whose Sources phase compiles the file
        #[arg(short, long, required = true)]
        target: Vec<String>,

        /// Dry run - validate and mutate in memory without touching disk
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of the changes
        #[arg(short, long)]
        diff: bool,

        /// Emit the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a project manifest's structure without modifying it
    Check {
        /// Path to the project.pbxproj file
        #[arg(short, long)]
        project: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            project,
            file,
            group,
            target,
            dry_run,
            diff,
            json,
        } => cmd_add(project, file, group, target, dry_run, diff, json),

        Commands::Check { project } => cmd_check(&project),
    }
}

/// Show unified diff between original and patched document
fn display_diff(file: &Path, original: &str, patched: &str) {
    println!("\n{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", sign);
    }
}

fn report_failure(failure: &RunFailure) {
    eprintln!("{} {}", "✗".red(), failure);
    if let Some(backup) = &failure.backup {
        eprintln!("  Backup of the original: {}", backup.display());
        eprintln!("  The destination file was not modified.");
    }
}

fn cmd_add(
    project: PathBuf,
    file: PathBuf,
    group: String,
    targets: Vec<String>,
    dry_run: bool,
    show_diff: bool,
    json: bool,
) -> Result<()> {
    let config = RunConfig {
        project: project.clone(),
        source_file: file,
        group,
        targets,
        dry_run,
    };

    let outcome = match Registrar::new(config).run() {
        Ok(outcome) => outcome,
        Err(failure) => {
            report_failure(&failure);
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        let report = &outcome.report;
        if dry_run {
            println!("{}", "[DRY RUN - no files were modified]".cyan());
        }
        println!(
            "{} Registered {} in {}",
            "✓".green(),
            report.file_name.bold(),
            project.display()
        );
        println!("  File reference id: {}", report.file_ref_id);
        for link in &report.targets {
            println!(
                "  Target {}: build file {} (Sources phase {})",
                link.target, link.build_file_id, link.sources_phase_id
            );
        }
        println!("  Sections touched: {}", report.sections_touched.join(", "));
        if let Some(backup) = &report.backup {
            println!("  Backup: {}", backup.display());
        }
    }

    if show_diff {
        display_diff(&project, &outcome.original, &outcome.patched);
    }

    Ok(())
}

fn cmd_check(project: &Path) -> Result<()> {
    let document = fs::read_to_string(project)?;

    println!("{}", "Project structure check".bold());
    println!("Project: {}", project.display());

    match validate::validate(&document) {
        Ok(()) => {
            let tokens = ident::token_population(&document);
            println!(
                "{} Structure OK ({} object identifiers)",
                "✓".green(),
                tokens.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}
