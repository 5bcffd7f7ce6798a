use std::path::PathBuf;

use clap::Args;

use crate::cli::{eprint_findings, load_config, print_findings, OutputFormat};
use crate::export::isolates::{export_isolates, ExportSummary, IsolateFormat};
use crate::matching::engine::{IsolatesReport, ResolutionEngine};
use crate::parsing::fasta::read_fasta_file;

#[derive(Args)]
pub struct IsolatesArgs {
    /// Multi-sequence FASTA file (optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Directory for per-isolate files (required unless --analyze-only)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Custom identity pattern, tried before the built-in rules
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Exclude contigs shorter than this
    #[arg(long)]
    pub min_length: Option<u64>,

    /// Exclude contigs longer than this
    #[arg(long)]
    pub max_length: Option<u64>,

    /// Format of the per-isolate files
    #[arg(long, value_enum, default_value = "fasta")]
    pub output_format: IsolateFormat,

    /// Report what would be written without creating files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Only print record and isolate statistics
    #[arg(long)]
    pub analyze_only: bool,

    /// JSON configuration file; command-line options take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute isolates subcommand
///
/// # Errors
///
/// Returns an error if the FASTA cannot be read, the options are inconsistent,
/// or the output directory cannot be created.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: IsolatesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(pattern) = &args.pattern {
        config.custom_pattern = Some(pattern.clone());
    }
    if args.min_length.is_some() {
        config.length_filter.min_length = args.min_length;
    }
    if args.max_length.is_some() {
        config.length_filter.max_length = args.max_length;
    }
    if let (Some(min), Some(max)) = (config.length_filter.min_length, config.length_filter.max_length) {
        if min > max {
            anyhow::bail!("--min-length ({min}) is greater than --max-length ({max})");
        }
    }

    let output_dir = match (&args.output_dir, args.analyze_only) {
        (Some(dir), false) => Some(dir.clone()),
        (None, false) => anyhow::bail!("--output-dir is required unless --analyze-only is given"),
        (_, true) => None,
    };

    let records = read_fasta_file(&args.input)?;
    if verbose {
        eprintln!("Read {} records from {}", records.len(), args.input.display());
    }

    let engine = ResolutionEngine::with_config(config)?;
    let report = engine.resolve_isolates(&records.inputs());

    let export = match &output_dir {
        Some(dir) => Some(export_isolates(
            &report.groups,
            &records,
            dir,
            args.output_format,
            args.dry_run,
        )?),
        None => None,
    };

    match format {
        OutputFormat::Text => print_text(&report, export.as_ref()),
        OutputFormat::Json => print_json(&report, export.as_ref())?,
        OutputFormat::Tsv => {
            print_tsv(&report);
            eprint_findings(&report.findings);
        }
    }

    if let Some(export) = &export {
        if !export.failed.is_empty() {
            anyhow::bail!("{} isolate file(s) could not be written", export.failed.len());
        }
    }

    Ok(())
}

fn print_text(report: &IsolatesReport, export: Option<&ExportSummary>) {
    let summary = &report.summary;
    println!("Records: {}", summary.total_records);
    if let (Some(min), Some(max), Some(mean)) =
        (summary.min_length, summary.max_length, summary.mean_length)
    {
        println!("   Length: min {min}, max {max}, mean {mean:.1}");
    }
    println!("   Identified isolates: {}", summary.identified_isolates);
    println!("   Unidentified records: {}", summary.unidentified_records);
    if summary.filtered_records > 0 {
        println!("   Filtered by length: {}", summary.filtered_records);
    }

    if !summary.isolates.is_empty() {
        println!("\nIsolates:");
        for row in &summary.isolates {
            println!("   {}: {} contigs", row.isolate, row.contig_count);
        }
    }

    if let Some(export) = export {
        let verb = if export.dry_run { "Would write" } else { "Wrote" };
        println!(
            "\n{verb} {} files ({} records) to {}",
            export.files.len(),
            export.records_written(),
            export.output_dir.display()
        );
        for failed in &export.failed {
            println!("   FAILED {}: {}", failed.path.display(), failed.error);
        }
    }

    print_findings(&report.findings);
}

fn print_json(report: &IsolatesReport, export: Option<&ExportSummary>) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "summary": report.summary,
        "findings": report.findings,
        "export": export,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(report: &IsolatesReport) {
    println!("isolate\tcontigs");
    for row in &report.rows {
        println!("{}\t{}", row.isolate, row.contig_count);
    }
}
