//! Resolution Property Test Suite
//!
//! Exercises the public engine API with in-memory inputs and probes, covering
//! pairing, ordering, custom patterns, validation and mate conflicts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sample_resolver::core::finding::Subject;
use sample_resolver::utils::validation::{FileSizeProbe, FileStatus};
use sample_resolver::{
    EngineConfig, FindingKind, RawInput, ResolutionEngine, Runtype, SampleGroup,
};

struct SizeTable(HashMap<PathBuf, u64>);

impl SizeTable {
    fn new(entries: &[(&str, u64)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(p, s)| (PathBuf::from(p), *s))
                .collect(),
        )
    }
}

impl FileSizeProbe for SizeTable {
    fn probe(&self, path: &Path) -> FileStatus {
        self.0
            .get(path)
            .map_or_else(FileStatus::missing, |s| FileStatus::present(*s))
    }
}

fn files(names: &[&str]) -> Vec<RawInput> {
    names.iter().map(|n| RawInput::from_path(*n)).collect()
}

fn engine() -> ResolutionEngine {
    ResolutionEngine::new().expect("default rules compile")
}

fn kinds(findings: &[sample_resolver::ValidationFinding]) -> Vec<FindingKind> {
    findings.iter().map(|f| f.kind).collect()
}

/// X_R1 and X_R2 resolve to one paired group with both mates set
#[test]
fn test_mates_pair_into_one_group() {
    let report = engine().resolve_reads(&files(&["X_R1.fastq.gz", "X_R2.fastq.gz"]), None);

    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.identity, "X");
    assert_eq!(group.runtype, Runtype::Paired);
    assert_eq!(group.r1.as_ref().unwrap().text, "X_R1.fastq.gz");
    assert_eq!(group.r2.as_ref().unwrap().text, "X_R2.fastq.gz");
    assert!(report.findings.is_empty());
}

/// A lone X_1 is an incomplete pair, never silently single-end
#[test]
fn test_lone_mate_is_incomplete() {
    let report = engine().resolve_reads(&files(&["X_1.fastq.gz"]), None);

    assert_eq!(report.groups[0].runtype, Runtype::IncompletePair);
    assert_eq!(kinds(&report.findings), vec![FindingKind::IncompletePair]);
    assert!(report.rows.is_empty());
}

/// Grouping does not depend on input order
#[test]
fn test_order_independence() {
    let forward = files(&["A_R1.fq", "B_R2.fq", "A_R2.fq", "B_R1.fq", "C.fq"]);
    let mut reversed = forward.clone();
    reversed.reverse();

    let sorted = |mut groups: Vec<SampleGroup>| {
        groups.sort_by(|a, b| a.identity.cmp(&b.identity));
        groups
    };
    let a = sorted(engine().resolve_reads(&forward, None).groups);
    let b = sorted(engine().resolve_reads(&reversed, None).groups);
    assert_eq!(a, b);
}

/// Running the same inputs twice gives identical rows and findings
#[test]
fn test_idempotence() {
    let inputs = files(&["A_R1.fq", "A_R2.fq", "A_R1_dup.fq", "junk.txt"]);
    let first = engine().resolve_reads(&inputs, None);
    let second = engine().resolve_reads(&inputs, None);
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.findings, second.findings);
}

/// A custom pattern's first group becomes the identity
#[test]
fn test_custom_pattern_isolate() {
    let engine = ResolutionEngine::with_config(EngineConfig {
        custom_pattern: Some(r"isolate_(\d+)".to_string()),
        ..EngineConfig::default()
    })
    .unwrap();
    let record = RawInput::from_record("contig_1 isolate_7 plasmid", "asm.fa", 0, 5000);
    let report = engine.resolve_isolates(&[record]);

    assert_eq!(report.groups[0].identity, "7");
    assert_eq!(report.rows[0].contig_count, 1);
}

/// Mates differing by 30% are flagged; by 5% they are not
#[test]
fn test_size_mismatch_threshold() {
    let inputs = files(&["/r/A_R1.fq", "/r/A_R2.fq", "/r/B_R1.fq", "/r/B_R2.fq"]);
    let probe = SizeTable::new(&[
        ("/r/A_R1.fq", 1000),
        ("/r/A_R2.fq", 700),
        ("/r/B_R1.fq", 1000),
        ("/r/B_R2.fq", 950),
    ]);
    let report = engine().resolve_reads(&inputs, Some(&probe));

    let mismatches: Vec<&Subject> = report
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::SizeMismatch)
        .map(|f| &f.subject)
        .collect();
    assert_eq!(mismatches, vec![&Subject::Sample("A".to_string())]);
    assert_eq!(report.rows.len(), 2);
}

/// Headers no rule recognizes are reported, not grouped
#[test]
fn test_unidentified_header() {
    let record = RawInput::from_record("plasmid_unknown_contig", "asm.fa", 0, 100);
    let report = engine().resolve_isolates(&[record]);

    assert!(report.groups.is_empty());
    assert_eq!(kinds(&report.findings), vec![FindingKind::Unidentified]);
    assert_eq!(report.summary.unidentified_records, 1);
}

/// The first R1 seen is canonical; the duplicate is reported
#[test]
fn test_duplicate_mate_keeps_first() {
    let report = engine().resolve_reads(
        &files(&["X_R1.fastq.gz", "X_R1_001.fastq.gz", "X_R2.fastq.gz"]),
        None,
    );

    let group = &report.groups[0];
    assert_eq!(group.r1.as_ref().unwrap().text, "X_R1.fastq.gz");
    assert_eq!(group.runtype, Runtype::Paired);

    let conflict = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::ConflictingMate)
        .expect("conflict reported");
    assert_eq!(conflict.input().unwrap().text, "X_R1_001.fastq.gz");
}

/// Missing and empty files are findings; groups with no existing file get no row
#[test]
fn test_missing_and_empty_files() {
    let inputs = files(&["/r/A_R1.fq", "/r/A_R2.fq", "/r/B.fq"]);
    let probe = SizeTable::new(&[("/r/A_R1.fq", 0), ("/r/A_R2.fq", 0)]);
    let report = engine().resolve_reads(&inputs, Some(&probe));

    let found = kinds(&report.findings);
    assert_eq!(found.iter().filter(|k| **k == FindingKind::EmptyFile).count(), 2);
    assert!(found.contains(&FindingKind::MissingFile));
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].sample, "A");
}

/// An identity-only custom pattern keeps the mate roles of the default rules
#[test]
fn test_custom_identity_pattern_still_pairs() {
    let engine = ResolutionEngine::with_config(EngineConfig {
        custom_pattern: Some(r"^([A-Z]+\d+)".to_string()),
        ..EngineConfig::default()
    })
    .unwrap();
    let report =
        engine.resolve_reads(&files(&["AB12_S1_R1.fastq.gz", "AB12_S1_R2.fastq.gz"]), None);

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].identity, "AB12");
    assert_eq!(report.groups[0].runtype, Runtype::Paired);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].sample, "AB12");
    assert_eq!(report.rows[0].runtype, "paired-end");
    assert!(report.findings.is_empty());
}

/// Suffixed names never reuse the identity of another sample
#[test]
fn test_suffixed_names_stay_unique() {
    let report = engine().resolve_reads(
        &files(&["S9.fastq.gz", "S9.fq", "S9_2.R1.fq", "S9_2.R2.fq"]),
        None,
    );

    let names: Vec<&str> = report.rows.iter().map(|r| r.sample.as_str()).collect();
    assert_eq!(names, vec!["S9", "S9_3", "S9_2"]);
    assert_eq!(report.rows[2].runtype, "paired-end");
}
