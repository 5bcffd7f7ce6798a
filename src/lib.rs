//! # sample-resolver
//!
//! A library for inferring sample identities from sequencing file names and
//! sequence headers.
//!
//! Sequencing facilities and assemblers encode the sample a file belongs to in
//! its name (`S12_R1_001.fastq.gz`) or in each record header
//! (`>contig_3 isolate_7 plasmid`), using many slightly different conventions.
//!
//! `sample-resolver` applies an ordered library of naming rules to these strings,
//! groups the results by identity, pairs forward and reverse reads, and reports
//! everything it could not resolve cleanly as findings rather than errors.
//!
//! ## Features
//!
//! - **Mate pairing**: `_R1`/`_R2`, `_1`/`_2` and `.R1.`/`.R2.` conventions
//! - **Isolate grouping**: contigs of a multi-sequence FASTA grouped by isolate
//! - **Custom patterns**: a caller-supplied regular expression takes precedence
//! - **Validation**: missing, empty and size-mismatched mate files
//! - **Sample sheets**: tab-separated `sample, runtype, r1, r2, extra`
//! - **Source tracking**: FASTA files merged with the origin file in each header
//!
//! ## Example
//!
//! ```rust,no_run
//! use sample_resolver::{RawInput, ResolutionEngine};
//! use sample_resolver::parsing::listing::FsProbe;
//!
//! let engine = ResolutionEngine::new().unwrap();
//! let inputs = vec![
//!     RawInput::from_path("/data/S1_R1.fastq.gz"),
//!     RawInput::from_path("/data/S1_R2.fastq.gz"),
//! ];
//! let report = engine.resolve_reads(&inputs, Some(&FsProbe));
//!
//! for row in &report.rows {
//!     println!("{}\t{}\t{}\t{}", row.sample, row.runtype, row.r1, row.r2);
//! }
//! for finding in &report.findings {
//!     eprintln!("{finding}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Inputs, observations, groups and findings
//! - [`matching`]: Naming rules, scanner and the resolution engine
//! - [`grouping`]: Identity grouping, mate resolution and length filtering
//! - [`utils`]: File validation against a size probe
//! - [`report`]: Sample sheet rows and summaries
//! - [`parsing`]: Directory listing and FASTA reading
//! - [`export`]: Sample sheet, per-isolate and merged FASTA writers
//! - [`rename`]: File name normalization
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod export;
pub mod grouping;
pub mod matching;
pub mod parsing;
pub mod rename;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::finding::{FindingKind, ValidationFinding};
pub use crate::core::group::SampleGroup;
pub use crate::core::input::RawInput;
pub use crate::core::types::*;
pub use matching::engine::{EngineConfig, IsolatesReport, ReadsReport, ResolutionEngine};
pub use matching::library::PatternLibrary;
