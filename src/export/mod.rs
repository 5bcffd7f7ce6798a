//! Writers for resolved samples and isolates.
//!
//! - [`sample_sheet`]: tab-separated sample sheet (`sample`, `runtype`, `r1`, `r2`, `extra`)
//! - [`isolates`]: one FASTA or GenBank file per isolate
//! - [`merge`]: FASTA files combined with the source file written into each header

use std::path::PathBuf;

use thiserror::Error;

pub mod isolates;
pub mod merge;
pub mod sample_sheet;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record {index} not found in {source_file}")]
    MissingRecord { source_file: PathBuf, index: usize },

    #[error("Invalid header template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("{path} would be written for both {first} and {second}")]
    OutputClash {
        path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}
