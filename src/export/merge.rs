//! Combine FASTA files while recording where every record came from.
//!
//! Each header is rebuilt from a template with three placeholders:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{filename}` | source file name without FASTA/gzip extensions, or a fixed prefix |
//! | `{num}` | 1-based position of the record in its source file |
//! | `{original}` | the original header line |
//!
//! With the default template `>contig_3 len=500` from `HSP1.fasta` becomes
//! `>HSP1_contig1_contig_3 len=500`. Records are either written next to each
//! other in one merged file or to one `<filename>_tracked.fasta` per source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use noodles::fasta::{self, record::Definition};
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::info;

use crate::export::ExportError;
use crate::parsing::fasta::{header_text, write_fasta_file, RecordSet};
use crate::report::summary::to_f64;

pub const DEFAULT_HEADER_TEMPLATE: &str = "{filename}_contig{num}_{original}";

/// Output file name used when all sources are merged
pub const MERGED_FILE_NAME: &str = "merged_multifasta.fasta";

const TRACKED_SUFFIX: &str = "_tracked.fasta";
const PLACEHOLDERS: [&str; 3] = ["filename", "num", "original"];

/// A validated header template
#[derive(Debug, Clone)]
pub struct HeaderTemplate {
    template: String,
    placeholder: Regex,
}

impl HeaderTemplate {
    /// Parse a template, rejecting unknown placeholders.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidTemplate` if the template is empty or uses a
    /// placeholder other than `{filename}`, `{num}` and `{original}`.
    pub fn new(template: &str) -> Result<Self, ExportError> {
        let invalid = |reason: String| ExportError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        if template.trim().is_empty() {
            return Err(invalid("template is empty".to_string()));
        }
        let placeholder = Regex::new(r"\{([^{}]*)\}").map_err(|e| invalid(e.to_string()))?;
        for caps in placeholder.captures_iter(template) {
            let name = &caps[1];
            if !PLACEHOLDERS.contains(&name) {
                return Err(invalid(format!("unknown placeholder {{{name}}}")));
            }
        }

        Ok(Self {
            template: template.to_string(),
            placeholder,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Header text for one record
    #[must_use]
    pub fn render(&self, filename: &str, num: usize, original: &str) -> String {
        self.placeholder
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "filename" => filename.to_string(),
                "num" => num.to_string(),
                _ => original.to_string(),
            })
            .into_owned()
    }
}

/// File name of `path` with any `.gz` and FASTA extension removed
#[must_use]
pub fn source_prefix(path: &Path) -> String {
    let name = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    let lower = name.to_ascii_lowercase();

    let mut end = name.len();
    if lower.ends_with(".gz") {
        end -= 3;
    }
    for extension in [".fasta", ".fna", ".fas", ".fa"] {
        if lower[..end].ends_with(extension) {
            end -= extension.len();
            break;
        }
    }
    name[..end].to_string()
}

/// Copies of the records of `set` with tracked headers, numbered from 1
#[must_use]
pub fn track_records(
    set: &RecordSet,
    prefix: &str,
    template: &HeaderTemplate,
) -> Vec<fasta::Record> {
    set.records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let header = template.render(prefix, i + 1, &header_text(record));
            let definition = match header.split_once(char::is_whitespace) {
                Some((name, description)) => Definition::new(
                    name.as_bytes().to_vec(),
                    Some(description.as_bytes().to_vec().into()),
                ),
                None => Definition::new(header.into_bytes(), None),
            };
            fasta::Record::new(definition, record.sequence().clone())
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub template: HeaderTemplate,
    /// Replaces the file name of every source in `{filename}`
    pub prefix: Option<String>,
    /// Write a single file instead of one per source
    pub merge: bool,
    /// Name of the merged file
    pub merged_name: String,
    pub dry_run: bool,
}

impl MergeOptions {
    /// Per-source output with the default template
    ///
    /// # Errors
    ///
    /// Fails only if the default template is rejected.
    pub fn new() -> Result<Self, ExportError> {
        Ok(Self {
            template: HeaderTemplate::new(DEFAULT_HEADER_TEMPLATE)?,
            prefix: None,
            merge: false,
            merged_name: MERGED_FILE_NAME.to_string(),
            dry_run: false,
        })
    }
}

/// One source file and where its records went
#[derive(Debug, Clone, Serialize)]
pub struct TrackedSource {
    pub source: PathBuf,
    pub prefix: String,
    pub records: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeSummary {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub merged: bool,
    pub sources: Vec<TrackedSource>,
    /// Files written (or planned), in order
    pub outputs: Vec<PathBuf>,
}

impl MergeSummary {
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.sources.iter().map(|s| s.records).sum()
    }

    #[must_use]
    pub fn mean_records_per_file(&self) -> Option<f64> {
        if self.sources.is_empty() {
            return None;
        }
        Some(to_f64(self.total_records() as u64) / to_f64(self.sources.len() as u64))
    }
}

/// Rewrite the headers of every set and write them under `output_dir`.
///
/// All output paths are decided before anything is written.
///
/// # Errors
///
/// Returns `ExportError::OutputClash` if two sources would be written to the
/// same per-source file, and `ExportError::Write` if the directory or a file
/// cannot be written.
pub fn merge_fasta_files(
    sets: &[RecordSet],
    options: &MergeOptions,
    output_dir: &Path,
) -> Result<MergeSummary, ExportError> {
    let mut summary = MergeSummary {
        output_dir: output_dir.to_path_buf(),
        dry_run: options.dry_run,
        merged: options.merge,
        ..MergeSummary::default()
    };

    let mut owners: HashMap<PathBuf, &Path> = HashMap::new();
    for set in sets {
        let prefix = options
            .prefix
            .clone()
            .unwrap_or_else(|| source_prefix(&set.source));
        let output = if options.merge {
            output_dir.join(&options.merged_name)
        } else {
            let output = output_dir.join(format!("{prefix}{TRACKED_SUFFIX}"));
            if let Some(first) = owners.insert(output.clone(), &set.source) {
                return Err(ExportError::OutputClash {
                    path: output,
                    first: first.to_path_buf(),
                    second: set.source.clone(),
                });
            }
            output
        };
        if !summary.outputs.contains(&output) {
            summary.outputs.push(output.clone());
        }
        summary.sources.push(TrackedSource {
            source: set.source.clone(),
            prefix,
            records: set.len(),
            output,
        });
    }

    if options.dry_run {
        for source in &summary.sources {
            info!(
                "[dry run] Would write {} records from {} to {}",
                source.records,
                source.source.display(),
                source.output.display()
            );
        }
        return Ok(summary);
    }

    let write_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ExportError::Write { path, source }
    };
    std::fs::create_dir_all(output_dir).map_err(write_error(output_dir))?;

    let tracked: Vec<Vec<fasta::Record>> = sets
        .iter()
        .zip(&summary.sources)
        .map(|(set, source)| track_records(set, &source.prefix, &options.template))
        .collect();

    if options.merge {
        if let Some(output) = summary.outputs.first() {
            write_fasta_file(output, tracked.iter().flatten()).map_err(write_error(output))?;
            info!("Wrote {} records to {}", summary.total_records(), output.display());
        }
    } else {
        for (records, source) in tracked.iter().zip(&summary.sources) {
            write_fasta_file(&source.output, records).map_err(write_error(&source.output))?;
            info!("Processed {}: {} contigs", source.source.display(), records.len());
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::fasta::read_fasta_file;
    use tempfile::TempDir;

    fn fixture(dir: &Path, name: &str, content: &str) -> RecordSet {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        read_fasta_file(&path).unwrap()
    }

    fn headers(path: &Path) -> Vec<String> {
        read_fasta_file(path)
            .unwrap()
            .inputs()
            .into_iter()
            .map(|i| i.text)
            .collect()
    }

    #[test]
    fn test_render_default_template() {
        let template = HeaderTemplate::new(DEFAULT_HEADER_TEMPLATE).unwrap();
        assert_eq!(template.render("HSP1", 3, "NODE_3 len=500"), "HSP1_contig3_NODE_3 len=500");

        let piped = HeaderTemplate::new("{filename}|contig_{num}|{original}").unwrap();
        assert_eq!(piped.render("a", 1, "x"), "a|contig_1|x");
    }

    #[test]
    fn test_template_rejects_unknown_placeholder() {
        assert!(matches!(
            HeaderTemplate::new("{sample}_{num}"),
            Err(ExportError::InvalidTemplate { .. })
        ));
        assert!(HeaderTemplate::new("  ").is_err());
        assert!(HeaderTemplate::new("fixed_name").is_ok());
    }

    #[test]
    fn test_source_prefix() {
        assert_eq!(source_prefix(Path::new("/d/HSP1.fasta")), "HSP1");
        assert_eq!(source_prefix(Path::new("HSP1_001.FA.gz")), "HSP1_001");
        assert_eq!(source_prefix(Path::new("asm.v2.fna")), "asm.v2");
        assert_eq!(source_prefix(Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn test_per_file_output() {
        let dir = TempDir::new().unwrap();
        let a = fixture(dir.path(), "A1.fasta", ">NODE_1 len=8\nACGTACGT\n>NODE_2\nGG\n");
        let b = fixture(dir.path(), "B2.fa", ">ctg\nTTTT\n");
        let out = dir.path().join("out");

        let summary = merge_fasta_files(&[a, b], &MergeOptions::new().unwrap(), &out).unwrap();
        assert_eq!(summary.total_records(), 3);
        assert_eq!(summary.mean_records_per_file(), Some(1.5));
        assert_eq!(
            headers(&out.join("A1_tracked.fasta")),
            vec!["A1_contig1_NODE_1 len=8", "A1_contig2_NODE_2"]
        );
        assert_eq!(headers(&out.join("B2_tracked.fasta")), vec!["B2_contig1_ctg"]);
    }

    #[test]
    fn test_merged_output_restarts_numbering() {
        let dir = TempDir::new().unwrap();
        let a = fixture(dir.path(), "A1.fasta", ">x\nAC\n>y\nGT\n");
        let b = fixture(dir.path(), "B2.fasta", ">z\nTT\n");
        let out = dir.path().join("out");
        let options = MergeOptions {
            merge: true,
            ..MergeOptions::new().unwrap()
        };

        let summary = merge_fasta_files(&[a, b], &options, &out).unwrap();
        assert_eq!(summary.outputs, vec![out.join(MERGED_FILE_NAME)]);
        assert_eq!(
            headers(&out.join(MERGED_FILE_NAME)),
            vec!["A1_contig1_x", "A1_contig2_y", "B2_contig1_z"]
        );
        assert!(!out.join("A1_tracked.fasta").exists());
    }

    #[test]
    fn test_prefix_and_dry_run() {
        let dir = TempDir::new().unwrap();
        let a = fixture(dir.path(), "A1.fasta", ">x\nAC\n");
        let out = dir.path().join("planned");
        let options = MergeOptions {
            prefix: Some("Proj".to_string()),
            dry_run: true,
            ..MergeOptions::new().unwrap()
        };

        let summary = merge_fasta_files(&[a], &options, &out).unwrap();
        assert_eq!(summary.sources[0].prefix, "Proj");
        assert_eq!(summary.outputs, vec![out.join("Proj_tracked.fasta")]);
        assert!(!out.exists());
    }

    #[test]
    fn test_same_prefix_is_a_clash() {
        let dir = TempDir::new().unwrap();
        let a = fixture(dir.path(), "S1.fa", ">x\nAC\n");
        let b = fixture(dir.path(), "S1.fasta", ">y\nGT\n");
        let out = dir.path().join("out");

        let result = merge_fasta_files(&[a, b], &MergeOptions::new().unwrap(), &out);
        assert!(matches!(result, Err(ExportError::OutputClash { .. })));
        assert!(!out.exists());
    }
}
