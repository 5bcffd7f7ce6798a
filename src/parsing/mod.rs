//! Readers that turn files and directories into raw inputs.
//!
//! - **Directories**: FASTQ files are listed by name ([`listing`])
//! - **FASTA files**: each record becomes one input whose text is its header ([`fasta`])
//!
//! Plain and gzip-compressed files are supported.

pub mod fasta;
pub mod listing;
