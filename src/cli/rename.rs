use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::listing::{is_sequence_file, list_files, FsProbe};
use crate::rename::{
    apply, plan_renames, ApplyOptions, RenameOutcome, RenamePlan, RenameScheme, BACKUP_DIR_NAME,
};

#[derive(Args)]
pub struct RenameArgs {
    /// Directory containing FASTQ or FASTA files
    #[arg(required = true)]
    pub dir: PathBuf,

    /// Which name fields to keep
    #[arg(short, long, value_enum, default_value = "first-last")]
    pub scheme: RenameScheme,

    /// Appended after the kept fields (first-only and first-two)
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Search subdirectories too
    #[arg(short, long)]
    pub recursive: bool,

    /// Show the planned renames without moving files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Proceed despite conflicts, overwriting existing targets
    #[arg(long)]
    pub force: bool,

    /// Copy the original files into backup_originals/ before renaming
    #[arg(short, long)]
    pub backup: bool,
}

/// Execute rename subcommand
///
/// # Errors
///
/// Returns an error if the directory cannot be scanned or the plan has
/// conflicts and `--force` was not given.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RenameArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if !args.suffix.is_empty() && args.scheme == RenameScheme::FirstLast {
        eprintln!("Warning: --suffix is ignored by the first-last scheme");
    }

    let mut files = list_files(&args.dir, args.recursive, is_sequence_file)?;
    files.retain(|path| !path.components().any(|c| c.as_os_str() == BACKUP_DIR_NAME));
    if files.is_empty() {
        eprintln!("Warning: No FASTQ or FASTA files found in {}", args.dir.display());
        return Ok(());
    }

    let plan = plan_renames(&files, args.scheme, &args.suffix, &FsProbe);
    if verbose {
        eprintln!(
            "Planned {} renames for {} files ({} conflicts)",
            plan.moves.len(),
            files.len(),
            plan.conflicts.len()
        );
    }

    let options = ApplyOptions {
        dry_run: args.dry_run,
        force: args.force,
        backup: args.backup,
    };
    let outcome = apply(&plan, options)?;

    match format {
        OutputFormat::Text => print_text(&plan, &outcome),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "plan": plan,
                "outcome": outcome,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_tsv(&outcome),
    }

    if !outcome.failed.is_empty() {
        anyhow::bail!("{} file(s) could not be renamed", outcome.failed.len());
    }
    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn print_text(plan: &RenamePlan, outcome: &RenameOutcome) {
    let prefix = if outcome.dry_run { "[dry run] " } else { "" };
    for mv in &outcome.renamed {
        println!("{prefix}{} -> {}", file_name(&mv.from), file_name(&mv.to));
    }
    for mv in &outcome.skipped {
        println!("SKIPPED {} -> {} (target claimed)", file_name(&mv.from), file_name(&mv.to));
    }
    for (mv, error) in &outcome.failed {
        println!("FAILED {}: {error}", file_name(&mv.from));
    }

    if !plan.conflicts.is_empty() {
        println!("\nConflicts ({}):", plan.conflicts.len());
        for conflict in &plan.conflicts {
            println!("   {conflict}");
        }
    }

    if !outcome.backups.is_empty() {
        println!("\nBacked up {} files", outcome.backups.len());
    }

    let verb = if outcome.dry_run { "Would rename" } else { "Renamed" };
    println!("\n{verb} {} files", outcome.renamed.len());
}

fn print_tsv(outcome: &RenameOutcome) {
    println!("from\tto\tstatus");
    let status = if outcome.dry_run { "planned" } else { "renamed" };
    for mv in &outcome.renamed {
        println!("{}\t{}\t{status}", mv.from.display(), mv.to.display());
    }
    for mv in &outcome.skipped {
        println!("{}\t{}\tskipped", mv.from.display(), mv.to.display());
    }
    for (mv, _) in &outcome.failed {
        println!("{}\t{}\tfailed", mv.from.display(), mv.to.display());
    }
}
