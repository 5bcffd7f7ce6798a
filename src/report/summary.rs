use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::finding::{FindingKind, ValidationFinding};
use crate::core::group::SampleGroup;
use crate::core::input::RawInput;
use crate::core::types::Runtype;
use crate::report::rows::IsolateRow;

/// Helper function to convert counts to f64 with explicit precision loss allowance
#[inline]
pub(crate) fn to_f64(value: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        value as f64
    }
}

/// Finding totals keyed by kind, in a stable order for display
fn count_findings(findings: &[ValidationFinding]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.kind.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Totals for a FASTQ pairing run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadsSummary {
    pub inputs: usize,
    pub samples: usize,
    pub paired: usize,
    pub single: usize,
    pub incomplete_pairs: usize,
    pub findings: BTreeMap<String, usize>,
}

impl ReadsSummary {
    pub fn new(inputs: usize, groups: &[SampleGroup], findings: &[ValidationFinding]) -> Self {
        let count = |runtype: Runtype| groups.iter().filter(|g| g.runtype == runtype).count();
        Self {
            inputs,
            samples: groups.len(),
            paired: count(Runtype::Paired),
            single: count(Runtype::Single),
            incomplete_pairs: count(Runtype::IncompletePair),
            findings: count_findings(findings),
        }
    }
}

/// Record statistics for a contig file, computed before length filtering
#[derive(Debug, Clone, Default, Serialize)]
pub struct IsolateSummary {
    pub total_records: usize,
    pub identified_isolates: usize,
    pub unidentified_records: usize,
    pub filtered_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_length: Option<f64>,
    pub isolates: Vec<IsolateRow>,
}

impl IsolateSummary {
    /// Summarize `records` (everything read) against the resolved isolates.
    pub fn new(
        records: &[RawInput],
        isolates: Vec<IsolateRow>,
        findings: &[ValidationFinding],
    ) -> Self {
        let lengths: Vec<u64> = records.iter().filter_map(RawInput::length).collect();
        let total: u64 = lengths.iter().sum();
        let mean_length = if lengths.is_empty() {
            None
        } else {
            Some(to_f64(total) / to_f64(lengths.len() as u64))
        };
        let count_kind =
            |kind: FindingKind| findings.iter().filter(|f| f.kind == kind).count();

        Self {
            total_records: records.len(),
            identified_isolates: isolates.len(),
            unidentified_records: count_kind(FindingKind::Unidentified),
            filtered_records: count_kind(FindingKind::LengthFiltered),
            min_length: lengths.iter().copied().min(),
            max_length: lengths.iter().copied().max(),
            mean_length,
            isolates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::finding::Subject;

    #[test]
    fn test_isolate_summary() {
        let records = vec![
            RawInput::from_record("c1 S1_1", "a.fa", 0, 100),
            RawInput::from_record("c2 S1_1", "a.fa", 1, 300),
            RawInput::from_record("junk", "a.fa", 2, 200),
        ];
        let findings = vec![ValidationFinding::warning(
            FindingKind::Unidentified,
            Subject::Input(records[2].clone()),
            "no naming rule matched",
        )];
        let isolates = vec![IsolateRow {
            isolate: "S1_1".into(),
            contig_count: 2,
        }];

        let summary = IsolateSummary::new(&records, isolates, &findings);
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.identified_isolates, 1);
        assert_eq!(summary.unidentified_records, 1);
        assert_eq!(summary.filtered_records, 0);
        assert_eq!(summary.min_length, Some(100));
        assert_eq!(summary.max_length, Some(300));
        assert!((summary.mean_length.unwrap() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_isolate_summary() {
        let summary = IsolateSummary::new(&[], vec![], &[]);
        assert_eq!(summary.total_records, 0);
        assert!(summary.mean_length.is_none());
    }

    #[test]
    fn test_reads_summary() {
        let groups = vec![
            SampleGroup::new(
                "A",
                Some(RawInput::from_path("A_R1.fq")),
                Some(RawInput::from_path("A_R2.fq")),
                vec![],
            ),
            SampleGroup::new("B", Some(RawInput::from_path("B_R1.fq")), None, vec![]),
        ];
        let findings = vec![ValidationFinding::warning(
            FindingKind::IncompletePair,
            Subject::Sample("B".into()),
            "only R1",
        )];
        let summary = ReadsSummary::new(3, &groups, &findings);
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.paired, 1);
        assert_eq!(summary.incomplete_pairs, 1);
        assert_eq!(summary.findings.get("INCOMPLETE_PAIR"), Some(&1));
    }
}
