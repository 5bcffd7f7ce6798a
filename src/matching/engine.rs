use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::finding::{FindingKind, Subject, ValidationFinding};
use crate::core::group::SampleGroup;
use crate::core::input::RawInput;
use crate::grouping::filter::LengthFilter;
use crate::grouping::resolver::{GroupResolver, GroupingMode};
use crate::matching::library::{LibraryKind, PatternLibrary};
use crate::matching::rule::PatternError;
use crate::matching::scanner::CandidateScanner;
use crate::report::rows::{IsolateRow, ReportBuilder, ReportOptions, SampleRow};
use crate::report::summary::{IsolateSummary, ReadsSummary};
use crate::utils::validation::{FileSizeProbe, Validator};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration consumed when the engine is constructed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identity pattern tried before every default rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_pattern: Option<String>,

    /// Record length bounds for isolate grouping
    pub length_filter: LengthFilter,

    /// Sample sheet options
    pub report: ReportOptions,
}

impl EngineConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read or
    /// `ConfigError::ParseError` if it is not valid configuration JSON.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if the JSON does not describe a configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outcome of pairing FASTQ files
#[derive(Debug, Clone, Serialize)]
pub struct ReadsReport {
    pub groups: Vec<SampleGroup>,
    pub findings: Vec<ValidationFinding>,
    pub rows: Vec<SampleRow>,
    pub summary: ReadsSummary,
}

/// Outcome of grouping contigs by isolate
#[derive(Debug, Clone, Serialize)]
pub struct IsolatesReport {
    pub groups: Vec<SampleGroup>,
    pub findings: Vec<ValidationFinding>,
    pub rows: Vec<IsolateRow>,
    pub summary: IsolateSummary,
}

/// Runs scanner, resolver, validator and report builder for one configuration
pub struct ResolutionEngine {
    reads: PatternLibrary,
    isolates: PatternLibrary,
    length_filter: LengthFilter,
    builder: ReportBuilder,
    /// Problems with the configuration itself, repeated in every report
    config_findings: Vec<ValidationFinding>,
}

impl ResolutionEngine {
    /// Create an engine with default rules and no custom pattern
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if a built-in rule fails to compile.
    pub fn new() -> Result<Self, PatternError> {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine from configuration.
    ///
    /// An invalid custom pattern does not fail construction: it is reported as an
    /// `InvalidPattern` finding and only the default rules are used.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if a built-in rule fails to compile.
    pub fn with_config(config: EngineConfig) -> Result<Self, PatternError> {
        let mut reads = PatternLibrary::defaults(LibraryKind::Reads)?;
        let mut isolates = PatternLibrary::defaults(LibraryKind::Isolates)?;
        let mut config_findings = Vec::new();

        if let Some(pattern) = &config.custom_pattern {
            let installed = reads
                .set_custom_pattern(pattern)
                .and_then(|()| isolates.set_custom_pattern(pattern));
            if let Err(e) = installed {
                warn!("Ignoring custom pattern '{pattern}': {e}");
                config_findings.push(ValidationFinding::warning(
                    FindingKind::InvalidPattern,
                    Subject::Pattern(pattern.clone()),
                    format!("{e}; using default rules only"),
                ));
            }
        }

        Ok(Self {
            reads,
            isolates,
            length_filter: config.length_filter,
            builder: ReportBuilder::new(config.report),
            config_findings,
        })
    }

    /// Findings about the configuration itself
    #[must_use]
    pub fn config_findings(&self) -> &[ValidationFinding] {
        &self.config_findings
    }

    #[must_use]
    pub fn library(&self, kind: LibraryKind) -> &PatternLibrary {
        match kind {
            LibraryKind::Reads => &self.reads,
            LibraryKind::Isolates => &self.isolates,
        }
    }

    /// Pair FASTQ files into samples.
    ///
    /// When `probe` is given, the resolved groups are validated against it.
    pub fn resolve_reads(
        &self,
        inputs: &[RawInput],
        probe: Option<&dyn FileSizeProbe>,
    ) -> ReadsReport {
        let observations = CandidateScanner::new(&self.reads).scan(inputs);
        let resolution = GroupResolver::new(GroupingMode::Reads).resolve(observations);

        let mut findings = self.config_findings.clone();
        findings.extend(resolution.findings);
        if let Some(probe) = probe {
            findings.extend(Validator::new(probe).validate(&resolution.groups));
        }

        let rows = self.builder.build_sample_rows(&resolution.groups, &findings);
        let summary = ReadsSummary::new(inputs.len(), &resolution.groups, &findings);

        ReadsReport {
            groups: resolution.groups,
            findings,
            rows,
            summary,
        }
    }

    /// Group the records of a multi-sequence file by isolate.
    ///
    /// The length filter is applied before grouping; statistics in the summary
    /// cover every record.
    pub fn resolve_isolates(&self, records: &[RawInput]) -> IsolatesReport {
        let (kept, filtered) = self.length_filter.apply(records.to_vec());
        let observations = CandidateScanner::new(&self.isolates).scan(&kept);
        let resolution = GroupResolver::new(GroupingMode::Isolates).resolve(observations);

        let mut findings = self.config_findings.clone();
        findings.extend(filtered);
        findings.extend(resolution.findings);

        let rows = self.builder.build_isolate_rows(&resolution.groups);
        let summary = IsolateSummary::new(records, rows.clone(), &findings);

        IsolatesReport {
            groups: resolution.groups,
            findings,
            rows,
            summary,
        }
    }
}
