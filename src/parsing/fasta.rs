//! Reader and writer for multi-sequence FASTA files using noodles.
//!
//! Each record becomes one [`RawInput`] whose text is the full header line
//! (name plus description), which is where isolate identifiers usually live.
//! Output is always uncompressed, 80 bases per line.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna`, `.fas` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz`, `.fas.gz` (gzip compressed)

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::core::input::{Origin, RawInput};
use crate::utils::validation::check_record_limit;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Too many records: {0} exceeds maximum allowed (1000000)")]
    TooManyRecords(usize),
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fas.gz")
    {
        return true;
    }

    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna" | "fas")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// All records of one FASTA file, in file order
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub source: PathBuf,
    pub records: Vec<fasta::Record>,
}

impl RecordSet {
    /// One input per record, indexed by position in the file
    #[must_use]
    pub fn inputs(&self) -> Vec<RawInput> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                RawInput::from_record(
                    header_text(record),
                    &self.source,
                    index,
                    record.sequence().len() as u64,
                )
            })
            .collect()
    }

    /// Record behind an input produced by [`RecordSet::inputs`]
    #[must_use]
    pub fn record_for(&self, input: &RawInput) -> Option<&fasta::Record> {
        match &input.origin {
            Origin::Record { source, index, .. } if *source == self.source => {
                self.records.get(*index)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Header line without the leading `>`
pub fn header_text(record: &fasta::Record) -> String {
    let name = String::from_utf8_lossy(record.name());
    match record.description() {
        Some(description) => format!("{name} {}", String::from_utf8_lossy(description)),
        None => name.to_string(),
    }
}

/// Read every record of a FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, `ParseError::InvalidFormat` if no records are found, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn read_fasta_file(path: &Path) -> Result<RecordSet, ParseError> {
    let file = File::open(path)?;
    let records = if is_gzipped(path) {
        let mut reader = fasta::io::Reader::new(BufReader::new(GzDecoder::new(file)));
        read_records(&mut reader)?
    } else {
        let mut reader = fasta::io::Reader::new(BufReader::new(file));
        read_records(&mut reader)?
    };

    Ok(RecordSet {
        source: path.to_path_buf(),
        records,
    })
}

/// Write `records` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an IO error if the file cannot be created or written.
pub fn write_fasta_file<'r>(
    path: &Path,
    records: impl IntoIterator<Item = &'r fasta::Record>,
) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    {
        let mut writer = fasta::io::Writer::new(&mut file);
        for record in records {
            writer.write_record(record)?;
        }
    }
    file.flush()
}

fn read_records<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<fasta::Record>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if check_record_limit(records.len()).is_some() {
            return Err(ParseError::TooManyRecords(records.len()));
        }

        records.push(record);
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(records)
}
