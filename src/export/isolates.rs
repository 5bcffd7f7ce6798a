//! Write the contigs of each isolate to its own file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gb_io::seq::{Seq, Topology};
use noodles::fasta;
use serde::Serialize;
use tracing::{error, info};

use crate::core::group::SampleGroup;
use crate::export::ExportError;
use crate::parsing::fasta::{write_fasta_file, RecordSet};

/// File format for per-isolate output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IsolateFormat {
    #[default]
    Fasta,
    Genbank,
}

impl IsolateFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            IsolateFormat::Fasta => "fasta",
            IsolateFormat::Genbank => "gbk",
        }
    }
}

/// A file written (or, in a dry run, planned) for one isolate
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub isolate: String,
    pub path: PathBuf,
    pub records: usize,
}

/// A file that could not be written; other isolates are still exported
#[derive(Debug, Clone, Serialize)]
pub struct FailedExport {
    pub isolate: String,
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub files: Vec<ExportedFile>,
    pub failed: Vec<FailedExport>,
}

impl ExportSummary {
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }
}

/// Output file name for an isolate. Path separators are replaced so every
/// file lands directly in the output directory.
#[must_use]
pub fn output_path(output_dir: &Path, isolate: &str, format: IsolateFormat) -> PathBuf {
    let stem: String = isolate
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    output_dir.join(format!("{stem}.{}", format.extension()))
}

/// Write one file per group under `output_dir`.
///
/// With `dry_run` nothing is created; the summary lists what would be written.
/// A group whose output path was already claimed by an earlier group is not
/// written and is listed as failed.
///
/// # Errors
///
/// Returns `ExportError::Write` if the output directory cannot be created and
/// `ExportError::MissingRecord` if a group member does not belong to `records`.
/// Failures writing individual files are collected in the summary instead.
pub fn export_isolates(
    groups: &[SampleGroup],
    records: &RecordSet,
    output_dir: &Path,
    format: IsolateFormat,
    dry_run: bool,
) -> Result<ExportSummary, ExportError> {
    if !dry_run {
        std::fs::create_dir_all(output_dir).map_err(|source| ExportError::Write {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }

    let mut summary = ExportSummary {
        output_dir: output_dir.to_path_buf(),
        dry_run,
        ..ExportSummary::default()
    };
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();

    for group in groups {
        let members = group
            .members()
            .map(|input| {
                records
                    .record_for(input)
                    .ok_or_else(|| ExportError::MissingRecord {
                        source_file: records.source.clone(),
                        index: input.record_index().unwrap_or_default(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let path = output_path(output_dir, &group.identity, format);
        if let Some(owner) = claimed.get(&path) {
            error!("{} is already written for isolate '{owner}'", path.display());
            summary.failed.push(FailedExport {
                isolate: group.identity.clone(),
                error: format!("output file already used by isolate '{owner}'"),
                path,
            });
            continue;
        }
        claimed.insert(path.clone(), &group.identity);

        if dry_run {
            info!("[dry run] Would write {} ({} contigs)", path.display(), members.len());
        } else if let Err(e) = write_isolate(&path, &members, format) {
            error!("Failed to write {}: {e}", path.display());
            summary.failed.push(FailedExport {
                isolate: group.identity.clone(),
                path,
                error: e.to_string(),
            });
            continue;
        } else {
            info!("Wrote {} ({} contigs)", path.display(), members.len());
        }

        summary.files.push(ExportedFile {
            isolate: group.identity.clone(),
            path,
            records: members.len(),
        });
    }

    Ok(summary)
}

fn write_isolate(
    path: &Path,
    records: &[&fasta::Record],
    format: IsolateFormat,
) -> std::io::Result<()> {
    match format {
        IsolateFormat::Fasta => write_fasta_file(path, records.iter().copied()),
        IsolateFormat::Genbank => {
            let mut file = BufWriter::new(File::create(path)?);
            for record in records {
                gb_io::writer::write(&mut file, &to_genbank(record))?;
            }
            file.flush()
        }
    }
}

/// Linear DNA entry carrying the record's name, description and bases.
fn to_genbank(record: &fasta::Record) -> Seq {
    let sequence = record.sequence().as_ref().to_vec();
    Seq {
        name: Some(String::from_utf8_lossy(record.name()).into_owned()),
        topology: Topology::Linear,
        date: None,
        len: Some(sequence.len()),
        molecule_type: Some("DNA".to_string()),
        division: String::new(),
        definition: record
            .description()
            .map(|d| String::from_utf8_lossy(d).into_owned()),
        accession: None,
        version: None,
        source: None,
        dblink: None,
        keywords: None,
        references: vec![],
        comments: vec![],
        seq: sequence,
        contig: None,
        features: vec![],
    }
}
