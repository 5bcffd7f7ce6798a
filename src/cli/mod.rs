//! Command-line interface for sample-resolver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **samples**: Pair FASTQ files in a directory and write a sample sheet
//! - **isolates**: Split a multi-sequence FASTA into one file per isolate
//! - **rename**: Normalize sequence file names
//! - **merge**: Combine FASTA files, writing the source file into each header
//!
//! ## Usage
//!
//! ```text
//! # Sample sheet for a run directory
//! sample-resolver samples /data/run42 --output samples.tsv
//!
//! # Same, as JSON including every finding
//! sample-resolver samples /data/run42 --format json
//!
//! # Contigs by isolate, GenBank output
//! sample-resolver isolates contigs.fasta --output-dir isolates/ --output-format genbank
//!
//! # Preview renames
//! sample-resolver rename /data/run42 --scheme first-last --dry-run
//!
//! # One multi-FASTA from every assembly, headers tagged with their file
//! sample-resolver merge assemblies/ --merge --output-dir merged/
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::core::finding::ValidationFinding;
use crate::matching::engine::EngineConfig;

pub mod isolates;
pub mod merge;
pub mod rename;
pub mod samples;

#[derive(Parser)]
#[command(name = "sample-resolver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Resolve sample identities from FASTQ file names and FASTA headers")]
#[command(
    long_about = "sample-resolver infers which sample each sequencing file or contig belongs to.\n\nIt applies an ordered set of naming rules and provides:\n- Mate pairing of FASTQ files into a sample sheet\n- Grouping of assembly contigs by isolate\n- Merging of assemblies with source-tracked headers\n- Findings for missing, empty, unpaired or mismatched files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pair FASTQ files into samples and write a sample sheet
    Samples(samples::SamplesArgs),

    /// Group the contigs of a FASTA file by isolate
    Isolates(isolates::IsolatesArgs),

    /// Normalize FASTQ/FASTA file names
    Rename(rename::RenameArgs),

    /// Combine FASTA files with source tracking in every header
    Merge(merge::MergeArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load engine configuration from `path`, or defaults when no file is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load_from_file(path)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn print_findings(findings: &[ValidationFinding]) {
    if findings.is_empty() {
        return;
    }
    println!("\nFindings ({}):", findings.len());
    for finding in findings {
        println!("   {finding}");
    }
}

/// Findings on stderr, keeping stdout machine-readable
fn eprint_findings(findings: &[ValidationFinding]) {
    for finding in findings {
        eprintln!("Warning: {finding}");
    }
}
