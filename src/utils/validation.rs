//! Post-hoc validation of resolved groups and shared input limits.

use std::path::Path;

use tracing::debug;

use crate::core::finding::{FindingKind, Subject, ValidationFinding};
use crate::core::group::SampleGroup;
use crate::core::input::RawInput;
use crate::core::types::Runtype;

/// Maximum number of records read from a single FASTA file (DOS protection)
pub const MAX_RECORDS: usize = 1_000_000;

/// Mates whose sizes differ by more than this percentage of the larger
/// file are reported. Fixed; not configurable.
pub const SIZE_MISMATCH_THRESHOLD: u64 = 10;

/// Existence and size of a file, as reported by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStatus {
    pub exists: bool,
    pub size_bytes: u64,
}

impl FileStatus {
    pub fn present(size_bytes: u64) -> Self {
        Self {
            exists: true,
            size_bytes,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// Capability to look up file existence and size.
///
/// Supplied by the caller so that validation itself never touches the
/// filesystem.
pub trait FileSizeProbe {
    fn probe(&self, path: &Path) -> FileStatus;
}

impl<F> FileSizeProbe for F
where
    F: Fn(&Path) -> FileStatus,
{
    fn probe(&self, path: &Path) -> FileStatus {
        self(path)
    }
}

/// True when `a` and `b` differ by more than [`SIZE_MISMATCH_THRESHOLD`] percent of the larger.
#[must_use]
pub fn sizes_mismatch(a: u64, b: u64) -> bool {
    let larger = u128::from(a.max(b));
    let diff = u128::from(a.abs_diff(b));
    diff * 100 > larger * u128::from(SIZE_MISMATCH_THRESHOLD)
}

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Checks resolved groups against the filesystem through a probe
pub struct Validator<'a> {
    probe: &'a dyn FileSizeProbe,
}

impl<'a> Validator<'a> {
    pub fn new(probe: &'a dyn FileSizeProbe) -> Self {
        Self { probe }
    }

    /// Report missing and empty files, and paired mates of very different size.
    ///
    /// Record inputs have no file of their own and are not probed.
    pub fn validate(&self, groups: &[SampleGroup]) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();

        for group in groups {
            for input in group.members() {
                self.check_input(input, &mut findings);
            }

            if group.runtype == Runtype::Paired {
                if let Some(finding) = self.check_pair(group) {
                    findings.push(finding);
                }
            }
        }

        debug!("Validated {} groups: {} findings", groups.len(), findings.len());
        findings
    }

    fn status(&self, input: &RawInput) -> Option<FileStatus> {
        input.path().map(|p| self.probe.probe(p))
    }

    fn check_input(&self, input: &RawInput, findings: &mut Vec<ValidationFinding>) {
        let Some(status) = self.status(input) else {
            return;
        };
        if !status.exists {
            findings.push(ValidationFinding::warning(
                FindingKind::MissingFile,
                Subject::Input(input.clone()),
                format!("file not found: {input}"),
            ));
        } else if status.size_bytes == 0 {
            findings.push(ValidationFinding::warning(
                FindingKind::EmptyFile,
                Subject::Input(input.clone()),
                format!("file is empty: {input}"),
            ));
        }
    }

    fn check_pair(&self, group: &SampleGroup) -> Option<ValidationFinding> {
        let r1 = self.status(group.r1.as_ref()?)?;
        let r2 = self.status(group.r2.as_ref()?)?;
        if !(r1.exists && r2.exists) || !sizes_mismatch(r1.size_bytes, r2.size_bytes) {
            return None;
        }
        Some(ValidationFinding::warning(
            FindingKind::SizeMismatch,
            Subject::Sample(group.identity.clone()),
            format!(
                "paired files differ in size by more than {SIZE_MISMATCH_THRESHOLD}%: R1 {} bytes, R2 {} bytes",
                r1.size_bytes, r2.size_bytes
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct MapProbe(HashMap<PathBuf, u64>);

    impl FileSizeProbe for MapProbe {
        fn probe(&self, path: &Path) -> FileStatus {
            self.0
                .get(path)
                .map_or_else(FileStatus::missing, |size| FileStatus::present(*size))
        }
    }

    fn probe(entries: &[(&str, u64)]) -> MapProbe {
        MapProbe(
            entries
                .iter()
                .map(|(p, s)| (PathBuf::from(p), *s))
                .collect(),
        )
    }

    fn pair(r1: &str, r2: &str) -> SampleGroup {
        SampleGroup::new(
            "X",
            Some(RawInput::from_path(r1)),
            Some(RawInput::from_path(r2)),
            vec![],
        )
    }

    #[test]
    fn test_sizes_mismatch_threshold() {
        assert!(sizes_mismatch(1_000_000, 1_300_000));
        assert!(!sizes_mismatch(1_000_000, 1_050_000));
        // exactly 10% of the larger is tolerated
        assert!(!sizes_mismatch(900, 1000));
        assert!(sizes_mismatch(899, 1000));
        assert!(!sizes_mismatch(0, 0));
        assert!(!sizes_mismatch(u64::MAX, u64::MAX - 1));
    }

    #[test]
    fn test_size_mismatch_finding() {
        let p = probe(&[("X_R1.fq", 1_000_000), ("X_R2.fq", 1_300_000)]);
        let findings = Validator::new(&p).validate(&[pair("X_R1.fq", "X_R2.fq")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::SizeMismatch);
        assert_eq!(findings[0].subject, Subject::Sample("X".to_string()));
    }

    #[test]
    fn test_similar_sizes_pass() {
        let p = probe(&[("X_R1.fq", 1_000_000), ("X_R2.fq", 1_050_000)]);
        assert!(Validator::new(&p)
            .validate(&[pair("X_R1.fq", "X_R2.fq")])
            .is_empty());
    }

    #[test]
    fn test_missing_and_empty_files() {
        let p = probe(&[("X_R1.fq", 0)]);
        let findings = Validator::new(&p).validate(&[pair("X_R1.fq", "X_R2.fq")]);
        let kinds: Vec<FindingKind> = findings.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FindingKind::EmptyFile, FindingKind::MissingFile]);
        assert_eq!(findings[1].input().unwrap().text, "X_R2.fq");
    }

    #[test]
    fn test_closure_probe_and_records_skipped() {
        let group = SampleGroup::new(
            "S1_1",
            None,
            None,
            vec![RawInput::from_record("c1 S1_1", "all.fa", 0, 10)],
        );
        let never_called = |_: &Path| -> FileStatus { panic!("records must not be probed") };
        assert!(Validator::new(&never_called).validate(&[group]).is_empty());
    }

    #[test]
    fn test_record_limit() {
        assert!(check_record_limit(0).is_none());
        assert!(check_record_limit(MAX_RECORDS).is_some());
    }
}
