use std::collections::HashMap;

use tracing::debug;

use crate::core::finding::{FindingKind, Subject, ValidationFinding};
use crate::core::group::SampleGroup;
use crate::core::input::RawInput;
use crate::core::observation::Observation;
use crate::core::types::{MateRole, Runtype};

/// How observations sharing an identity are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// FASTQ files: mates are paired, extra unpaired files are ambiguous
    Reads,
    /// FASTA records: every record is a contig of its isolate
    Isolates,
}

/// Groups plus the findings raised while building them
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// In order of first discovery
    pub groups: Vec<SampleGroup>,
    pub findings: Vec<ValidationFinding>,
}

#[derive(Debug)]
struct PendingGroup {
    identity: String,
    r1: Option<RawInput>,
    r2: Option<RawInput>,
    singles: Vec<RawInput>,
}

impl PendingGroup {
    fn new(identity: String) -> Self {
        Self {
            identity,
            r1: None,
            r2: None,
            singles: Vec::new(),
        }
    }
}

/// Aggregates observations into sample groups
pub struct GroupResolver {
    mode: GroupingMode,
}

impl GroupResolver {
    pub fn new(mode: GroupingMode) -> Self {
        Self { mode }
    }

    /// Group observations by identity.
    ///
    /// Unmatched observations become `Unidentified` findings. When two inputs
    /// claim the same mate role the first one in input order is kept and each
    /// later one is reported as a `ConflictingMate`.
    pub fn resolve(&self, observations: Vec<Observation>) -> Resolution {
        let mut findings = Vec::new();
        let mut pending: Vec<PendingGroup> = Vec::new();
        let mut by_identity: HashMap<String, usize> = HashMap::new();

        for observation in observations {
            let Some(identity) = observation.identity else {
                findings.push(ValidationFinding::warning(
                    FindingKind::Unidentified,
                    Subject::Input(observation.input),
                    "no naming rule matched",
                ));
                continue;
            };

            let idx = *by_identity.entry(identity.clone()).or_insert_with(|| {
                pending.push(PendingGroup::new(identity.clone()));
                pending.len() - 1
            });
            let group = &mut pending[idx];

            match (self.mode, observation.role) {
                (GroupingMode::Reads, MateRole::R1) => {
                    place_mate(&mut group.r1, observation.input, MateRole::R1, &identity, &mut findings);
                }
                (GroupingMode::Reads, MateRole::R2) => {
                    place_mate(&mut group.r2, observation.input, MateRole::R2, &identity, &mut findings);
                }
                _ => group.singles.push(observation.input),
            }
        }

        let groups: Vec<SampleGroup> = pending
            .into_iter()
            .map(|p| SampleGroup::new(p.identity, p.r1, p.r2, p.singles))
            .collect();

        if self.mode == GroupingMode::Reads {
            for group in &groups {
                check_read_group(group, &mut findings);
            }
        }

        debug!(
            "Resolved {} groups with {} findings",
            groups.len(),
            findings.len()
        );

        Resolution { groups, findings }
    }
}

fn place_mate(
    slot: &mut Option<RawInput>,
    input: RawInput,
    role: MateRole,
    identity: &str,
    findings: &mut Vec<ValidationFinding>,
) {
    match slot {
        Some(canonical) => {
            let detail = format!(
                "duplicate {role} for sample {identity}: keeping {canonical}, discarding {input}"
            );
            findings.push(ValidationFinding::warning(
                FindingKind::ConflictingMate,
                Subject::Input(input),
                detail,
            ));
        }
        None => *slot = Some(input),
    }
}

fn check_read_group(group: &SampleGroup, findings: &mut Vec<ValidationFinding>) {
    if group.runtype == Runtype::IncompletePair {
        let (present, missing) = if group.r1.is_some() {
            (MateRole::R1, MateRole::R2)
        } else {
            (MateRole::R2, MateRole::R1)
        };
        let label = group
            .lone_mate()
            .map(ToString::to_string)
            .unwrap_or_default();
        findings.push(ValidationFinding::warning(
            FindingKind::IncompletePair,
            Subject::Sample(group.identity.clone()),
            format!("only {present} found ({label}); no matching {missing}"),
        ));
    }

    let mates = usize::from(group.r1.is_some()) + usize::from(group.r2.is_some());
    if !group.singles.is_empty() && (group.singles.len() > 1 || mates > 0) {
        let members: Vec<String> = group.members().map(ToString::to_string).collect();
        findings.push(ValidationFinding::warning(
            FindingKind::AmbiguousIdentity,
            Subject::Sample(group.identity.clone()),
            format!(
                "{} inputs share this identity: {}",
                members.len(),
                members.join(", ")
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::library::PatternLibrary;
    use crate::matching::scanner::CandidateScanner;

    fn resolve_names(names: &[&str]) -> Resolution {
        let library = PatternLibrary::reads_defaults().unwrap();
        let inputs: Vec<RawInput> = names.iter().map(|n| RawInput::from_path(*n)).collect();
        let observations = CandidateScanner::new(&library).scan(&inputs);
        GroupResolver::new(GroupingMode::Reads).resolve(observations)
    }

    fn kinds(resolution: &Resolution) -> Vec<FindingKind> {
        resolution.findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_well_formed_pair() {
        let res = resolve_names(&["X_R1.fastq.gz", "X_R2.fastq.gz"]);
        assert_eq!(res.groups.len(), 1);
        let group = &res.groups[0];
        assert_eq!(group.identity, "X");
        assert_eq!(group.runtype, Runtype::Paired);
        assert_eq!(group.r1.as_ref().unwrap().text, "X_R1.fastq.gz");
        assert_eq!(group.r2.as_ref().unwrap().text, "X_R2.fastq.gz");
        assert!(res.findings.is_empty());
    }

    #[test]
    fn test_lone_mate_is_incomplete_pair() {
        let res = resolve_names(&["X_1.fastq.gz"]);
        assert_eq!(res.groups.len(), 1);
        assert_eq!(res.groups[0].runtype, Runtype::IncompletePair);
        assert_eq!(kinds(&res), vec![FindingKind::IncompletePair]);
        assert_eq!(res.findings[0].subject, Subject::Sample("X".to_string()));
    }

    #[test]
    fn test_mate_order_does_not_matter() {
        let forward = resolve_names(&["A_R1.fastq.gz", "A_R2.fastq.gz"]);
        let reverse = resolve_names(&["A_R2.fastq.gz", "A_R1.fastq.gz"]);
        assert_eq!(forward.groups, reverse.groups);
    }

    #[test]
    fn test_duplicate_r1_keeps_first() {
        let res = resolve_names(&["X_R1.fastq.gz", "X_R1_001.fastq.gz", "X_R2.fastq.gz"]);
        assert_eq!(res.groups.len(), 1);
        let group = &res.groups[0];
        assert_eq!(group.runtype, Runtype::Paired);
        assert_eq!(group.r1.as_ref().unwrap().text, "X_R1.fastq.gz");
        assert_eq!(kinds(&res), vec![FindingKind::ConflictingMate]);
        assert_eq!(res.findings[0].input().unwrap().text, "X_R1_001.fastq.gz");
        assert_eq!(res.findings[0].severity, crate::core::types::Severity::Warning);
    }

    #[test]
    fn test_unmatched_inputs_are_reported() {
        let res = resolve_names(&["readme.txt", "S_R1.fq", "S_R2.fq"]);
        assert_eq!(res.groups.len(), 1);
        assert_eq!(kinds(&res), vec![FindingKind::Unidentified]);
        assert_eq!(res.findings[0].input().unwrap().text, "readme.txt");
    }

    #[test]
    fn test_singles_and_discovery_order() {
        let res = resolve_names(&["B.fastq.gz", "A_R1.fq", "C.fq", "A_R2.fq"]);
        let ids: Vec<&str> = res.groups.iter().map(|g| g.identity.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(res.groups[0].runtype, Runtype::Single);
        assert_eq!(res.groups[2].runtype, Runtype::Single);
        assert!(res.findings.is_empty());
    }

    #[test]
    fn test_colliding_singles_are_ambiguous() {
        let res = resolve_names(&["S9.fastq.gz", "S9.fq"]);
        assert_eq!(res.groups.len(), 1);
        assert_eq!(res.groups[0].singles.len(), 2);
        assert_eq!(res.groups[0].runtype, Runtype::Single);
        assert_eq!(kinds(&res), vec![FindingKind::AmbiguousIdentity]);
    }

    #[test]
    fn test_isolate_mode_does_not_flag_shared_identity() {
        let library = PatternLibrary::isolate_defaults().unwrap();
        let inputs = vec![
            RawInput::from_record("c1 S1_1", "all.fa", 0, 100),
            RawInput::from_record("c2 S1_1", "all.fa", 1, 200),
            RawInput::from_record("c3 S2_1", "all.fa", 2, 300),
            RawInput::from_record("plasmid_unknown_contig", "all.fa", 3, 50),
        ];
        let observations = CandidateScanner::new(&library).scan(&inputs);
        let res = GroupResolver::new(GroupingMode::Isolates).resolve(observations);
        assert_eq!(res.groups.len(), 2);
        assert_eq!(res.groups[0].singles.len(), 2);
        assert_eq!(kinds(&res), vec![FindingKind::Unidentified]);
    }
}
