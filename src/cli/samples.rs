use std::path::PathBuf;

use clap::Args;

use crate::cli::{eprint_findings, load_config, print_findings, OutputFormat};
use crate::export::sample_sheet::{render_sample_sheet, write_sample_sheet_file};
use crate::matching::engine::{ReadsReport, ResolutionEngine};
use crate::parsing::listing::{list_fastq_inputs, FsProbe};
use crate::utils::validation::FileSizeProbe;

#[derive(Args)]
pub struct SamplesArgs {
    /// Directory containing FASTQ files
    #[arg(required = true)]
    pub dir: PathBuf,

    /// Search subdirectories too
    #[arg(short, long)]
    pub recursive: bool,

    /// Custom identity pattern, tried before the built-in rules.
    /// Uses the named group `identity` (or the first group) and an optional `role` group
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Write the sample sheet to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Genome size column value
    #[arg(long)]
    pub genome_size: Option<String>,

    /// Species column value
    #[arg(long)]
    pub species: Option<String>,

    /// Skip file existence and size checks
    #[arg(long)]
    pub no_validate: bool,

    /// Emit the lone mate of an incomplete pair as a single-end sample
    #[arg(long)]
    pub incomplete_as_single: bool,

    /// Keep repeated sample names instead of suffixing them
    #[arg(long)]
    pub allow_duplicate_names: bool,

    /// JSON configuration file; command-line options take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute samples subcommand
///
/// # Errors
///
/// Returns an error if the directory cannot be scanned, the configuration is
/// invalid, or the sample sheet cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SamplesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(pattern) = &args.pattern {
        config.custom_pattern = Some(pattern.clone());
    }
    if args.genome_size.is_some() {
        config.report.genome_size.clone_from(&args.genome_size);
    }
    if args.species.is_some() {
        config.report.species.clone_from(&args.species);
    }
    if args.incomplete_as_single {
        config.report.incomplete_as_single = true;
    }
    if args.allow_duplicate_names {
        config.report.unique_sample_names = false;
    }
    let options = config.report.clone();

    let inputs = list_fastq_inputs(&args.dir, args.recursive)?;
    if inputs.is_empty() {
        eprintln!("Warning: No FASTQ files found in {}", args.dir.display());
    }
    if verbose {
        eprintln!("Found {} FASTQ files in {}", inputs.len(), args.dir.display());
    }

    let engine = ResolutionEngine::with_config(config)?;
    let probe: Option<&dyn FileSizeProbe> = if args.no_validate { None } else { Some(&FsProbe) };
    let report = engine.resolve_reads(&inputs, probe);

    if let Some(path) = &args.output {
        write_sample_sheet_file(path, &report.rows, &options)?;
        eprintln!("Wrote {} samples to {}", report.rows.len(), path.display());
    }

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Tsv => {
            if args.output.is_none() {
                print!("{}", render_sample_sheet(&report.rows, &options));
            }
            eprint_findings(&report.findings);
        }
    }

    Ok(())
}

fn print_text(report: &ReadsReport) {
    let summary = &report.summary;
    println!(
        "Found {} samples from {} files ({} paired-end, {} single-end, {} incomplete pairs)",
        summary.samples, summary.inputs, summary.paired, summary.single, summary.incomplete_pairs
    );

    if !report.rows.is_empty() {
        println!();
        for row in &report.rows {
            println!("   {} ({})", row.sample, row.runtype);
            println!("      r1: {}", row.r1);
            if !row.r2.is_empty() {
                println!("      r2: {}", row.r2);
            }
        }
    }

    print_findings(&report.findings);
}

fn print_json(report: &ReadsReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "summary": report.summary,
        "samples": report.rows,
        "groups": report.groups,
        "findings": report.findings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
