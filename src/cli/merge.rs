use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::export::merge::{
    merge_fasta_files, HeaderTemplate, MergeOptions, MergeSummary, DEFAULT_HEADER_TEMPLATE,
    MERGED_FILE_NAME,
};
use crate::parsing::fasta::{is_fasta_file, read_fasta_file, RecordSet};
use crate::parsing::listing::list_files;

#[derive(Args)]
pub struct MergeArgs {
    /// FASTA files, or directories whose FASTA files are all used
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for the output files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Write every record to one file instead of one file per input
    #[arg(long)]
    pub merge: bool,

    /// File name of the merged output
    #[arg(long, default_value = MERGED_FILE_NAME)]
    pub merged_name: String,

    /// Use this instead of the input file name in headers
    #[arg(long)]
    pub prefix: Option<String>,

    /// Header template with {filename}, {num} and {original} placeholders
    #[arg(long, default_value = DEFAULT_HEADER_TEMPLATE)]
    pub header_format: String,

    /// Report what would be written without creating files
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute merge subcommand
///
/// # Errors
///
/// Returns an error if the header template is invalid, no input can be read,
/// or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MergeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let template = HeaderTemplate::new(&args.header_format)?;
    if verbose {
        eprintln!("Header template: {}", template.as_str());
    }

    let mut paths = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            paths.extend(list_files(input, false, is_fasta_file)?);
        } else if input.exists() {
            paths.push(input.clone());
        } else {
            anyhow::bail!("File not found: {}", input.display());
        }
    }

    let mut sets: Vec<RecordSet> = Vec::new();
    let mut unreadable = Vec::new();
    for path in &paths {
        match read_fasta_file(path) {
            Ok(set) => sets.push(set),
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                unreadable.push((path.clone(), e.to_string()));
            }
        }
    }
    if sets.is_empty() {
        anyhow::bail!("No readable FASTA files among {} input(s)", paths.len());
    }

    let options = MergeOptions {
        template,
        prefix: args.prefix.clone(),
        merge: args.merge,
        merged_name: args.merged_name.clone(),
        dry_run: args.dry_run,
    };
    let summary = merge_fasta_files(&sets, &options, &args.output_dir)?;

    match format {
        OutputFormat::Text => print_text(&summary, &unreadable),
        OutputFormat::Json => {
            let skipped: Vec<serde_json::Value> = unreadable
                .iter()
                .map(|(path, error)| serde_json::json!({ "path": path, "error": error }))
                .collect();
            let output = serde_json::json!({
                "summary": summary,
                "total_records": summary.total_records(),
                "skipped": skipped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_tsv(&summary),
    }

    Ok(())
}

fn print_text(summary: &MergeSummary, unreadable: &[(PathBuf, String)]) {
    for source in &summary.sources {
        println!("{}: {} contigs", source.source.display(), source.records);
    }
    for (path, error) in unreadable {
        println!("SKIPPED {}: {error}", path.display());
    }

    let verb = if summary.dry_run { "Would write" } else { "Wrote" };
    println!("\n{verb} {} files to {}", summary.outputs.len(), summary.output_dir.display());
    for output in &summary.outputs {
        println!("   {}", output.display());
    }

    println!("\nFiles processed: {}", summary.sources.len());
    println!("Total contigs: {}", summary.total_records());
    if let Some(mean) = summary.mean_records_per_file() {
        println!("Average contigs per file: {mean:.1}");
    }
}

fn print_tsv(summary: &MergeSummary) {
    println!("source\tprefix\tcontigs\toutput");
    for source in &summary.sources {
        println!(
            "{}\t{}\t{}\t{}",
            source.source.display(),
            source.prefix,
            source.records,
            source.output.display()
        );
    }
}
