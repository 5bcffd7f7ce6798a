use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::finding::{FindingKind, ValidationFinding};
use crate::core::group::SampleGroup;
use crate::core::input::RawInput;
use crate::core::types::Runtype;

/// Options controlling how groups become sample sheet rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Key the second and later rows of a colliding identity as `<identity>_<n>`,
    /// skipping any `n` whose name is already taken
    pub unique_sample_names: bool,

    /// Emit the lone mate of an incomplete pair as a single-end row
    pub incomplete_as_single: bool,

    /// Adds a `genome_size` column when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genome_size: Option<String>,

    /// Adds a `species` column when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            unique_sample_names: true,
            incomplete_as_single: false,
            genome_size: None,
            species: None,
        }
    }
}

impl ReportOptions {
    /// Whether sheets carry the `genome_size`/`species` columns
    #[must_use]
    pub fn has_metadata_columns(&self) -> bool {
        self.genome_size.is_some() || self.species.is_some()
    }
}

/// One line of a sample sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    pub sample: String,
    /// `paired-end` or `single-end`
    pub runtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    pub r1: String,
    pub r2: String,
    pub extra: String,
}

/// Contig count of one isolate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsolateRow {
    pub isolate: String,
    pub contig_count: usize,
}

/// Turns resolved groups into output rows
pub struct ReportBuilder {
    options: ReportOptions,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Build sample sheet rows in group discovery order.
    ///
    /// Inputs reported as `MissingFile` are not resolvable; a group with no
    /// resolvable member yields no row.
    pub fn build_sample_rows(
        &self,
        groups: &[SampleGroup],
        findings: &[ValidationFinding],
    ) -> Vec<SampleRow> {
        let missing: HashSet<PathBuf> = findings
            .iter()
            .filter(|f| f.kind == FindingKind::MissingFile)
            .filter_map(|f| f.input().and_then(RawInput::path))
            .map(PathBuf::from)
            .collect();

        let mut used: HashSet<String> = groups.iter().map(|g| g.identity.clone()).collect();
        let mut rows = Vec::new();
        for group in groups {
            let resolvable = group
                .members()
                .any(|m| m.path().map_or(true, |p| !missing.contains(p)));
            if !resolvable {
                continue;
            }

            for (n, (runtype, r1, r2)) in self.entries(group).into_iter().enumerate() {
                let sample = if n > 0 && self.options.unique_sample_names {
                    free_name(&group.identity, n + 1, &mut used)
                } else {
                    group.identity.clone()
                };
                rows.push(SampleRow {
                    sample,
                    runtype: runtype.sheet_label().to_string(),
                    genome_size: self.options.genome_size.clone(),
                    species: self.options.species.clone(),
                    r1: r1.to_string(),
                    r2: r2.map(ToString::to_string).unwrap_or_default(),
                    extra: String::new(),
                });
            }
        }
        rows
    }

    /// Row layout of one group: the mate row (if any) then one row per single.
    fn entries<'g>(
        &self,
        group: &'g SampleGroup,
    ) -> Vec<(Runtype, &'g RawInput, Option<&'g RawInput>)> {
        let mut entries = Vec::new();
        match (&group.r1, &group.r2) {
            (Some(r1), Some(r2)) => entries.push((Runtype::Paired, r1, Some(r2))),
            _ => {
                if let (true, Some(mate)) = (self.options.incomplete_as_single, group.lone_mate())
                {
                    entries.push((Runtype::Single, mate, None));
                }
            }
        }
        entries.extend(group.singles.iter().map(|s| (Runtype::Single, s, None)));
        entries
    }

    /// One row per isolate with at least one contig, in discovery order.
    pub fn build_isolate_rows(&self, groups: &[SampleGroup]) -> Vec<IsolateRow> {
        groups
            .iter()
            .filter(|g| !g.singles.is_empty())
            .map(|g| IsolateRow {
                isolate: g.identity.clone(),
                contig_count: g.singles.len(),
            })
            .collect()
    }
}

/// First `<identity>_<n>` with `n >= start` not in `used`, which it is added to
fn free_name(identity: &str, start: usize, used: &mut HashSet<String>) -> String {
    let mut n = start;
    loop {
        let candidate = format!("{identity}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::finding::Subject;

    fn paired(id: &str) -> SampleGroup {
        SampleGroup::new(
            id,
            Some(RawInput::from_path(format!("/d/{id}_R1.fq.gz"))),
            Some(RawInput::from_path(format!("/d/{id}_R2.fq.gz"))),
            vec![],
        )
    }

    #[test]
    fn test_paired_and_single_rows() {
        let single = SampleGroup::new("B", None, None, vec![RawInput::from_path("/d/B.fq")]);
        let rows = ReportBuilder::new(ReportOptions::default())
            .build_sample_rows(&[paired("A"), single], &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sample, "A");
        assert_eq!(rows[0].runtype, "paired-end");
        assert_eq!(rows[0].r1, "/d/A_R1.fq.gz");
        assert_eq!(rows[0].r2, "/d/A_R2.fq.gz");
        assert_eq!(rows[1].runtype, "single-end");
        assert_eq!(rows[1].r2, "");
        assert!(rows[1].genome_size.is_none());
    }

    #[test]
    fn test_incomplete_pair_excluded_by_default() {
        let group = SampleGroup::new("C", Some(RawInput::from_path("/d/C_1.fq")), None, vec![]);
        let builder = ReportBuilder::new(ReportOptions::default());
        assert!(builder.build_sample_rows(&[group.clone()], &[]).is_empty());

        let lenient = ReportBuilder::new(ReportOptions {
            incomplete_as_single: true,
            ..ReportOptions::default()
        });
        let rows = lenient.build_sample_rows(&[group], &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].runtype, "single-end");
        assert_eq!(rows[0].r1, "/d/C_1.fq");
    }

    #[test]
    fn test_colliding_singles_get_unique_names() {
        let group = SampleGroup::new(
            "S9",
            None,
            None,
            vec![
                RawInput::from_path("/d/S9.fastq.gz"),
                RawInput::from_path("/d/S9.fq"),
            ],
        );
        let rows = ReportBuilder::new(ReportOptions::default()).build_sample_rows(&[group.clone()], &[]);
        let names: Vec<&str> = rows.iter().map(|r| r.sample.as_str()).collect();
        assert_eq!(names, vec!["S9", "S9_2"]);

        let shared = ReportBuilder::new(ReportOptions {
            unique_sample_names: false,
            ..ReportOptions::default()
        })
        .build_sample_rows(&[group], &[]);
        assert!(shared.iter().all(|r| r.sample == "S9"));
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let singles = SampleGroup::new(
            "S9",
            None,
            None,
            vec![
                RawInput::from_path("/d/S9.fastq.gz"),
                RawInput::from_path("/d/S9.fq"),
                RawInput::from_path("/d/S9.fastq"),
            ],
        );
        let rows = ReportBuilder::new(ReportOptions::default())
            .build_sample_rows(&[singles, paired("S9_2"), paired("S9_4")], &[]);
        let names: Vec<&str> = rows.iter().map(|r| r.sample.as_str()).collect();
        assert_eq!(names, vec!["S9", "S9_3", "S9_5", "S9_2", "S9_4"]);
    }

    #[test]
    fn test_fully_missing_group_has_no_row() {
        let group = paired("A");
        let findings: Vec<ValidationFinding> = group
            .members()
            .map(|m| {
                ValidationFinding::warning(FindingKind::MissingFile, Subject::Input(m.clone()), "gone")
            })
            .collect();
        let builder = ReportBuilder::new(ReportOptions::default());
        assert!(builder.build_sample_rows(&[group.clone()], &findings).is_empty());
        // one mate still present keeps the row
        assert_eq!(builder.build_sample_rows(&[group], &findings[..1]).len(), 1);
    }

    #[test]
    fn test_metadata_columns() {
        let options = ReportOptions {
            genome_size: Some("5500000".into()),
            species: Some("Klebsiella pneumoniae".into()),
            ..ReportOptions::default()
        };
        assert!(options.has_metadata_columns());
        let rows = ReportBuilder::new(options).build_sample_rows(&[paired("A")], &[]);
        assert_eq!(rows[0].species.as_deref(), Some("Klebsiella pneumoniae"));
        assert_eq!(rows[0].genome_size.as_deref(), Some("5500000"));
    }

    #[test]
    fn test_isolate_rows() {
        let groups = vec![
            SampleGroup::new(
                "S1_1",
                None,
                None,
                vec![
                    RawInput::from_record("c1 S1_1", "a.fa", 0, 10),
                    RawInput::from_record("c2 S1_1", "a.fa", 1, 10),
                ],
            ),
            SampleGroup::new("S2_1", None, None, vec![RawInput::from_record("c3 S2_1", "a.fa", 2, 10)]),
        ];
        let rows = ReportBuilder::new(ReportOptions::default()).build_isolate_rows(&groups);
        assert_eq!(
            rows,
            vec![
                IsolateRow { isolate: "S1_1".into(), contig_count: 2 },
                IsolateRow { isolate: "S2_1".into(), contig_count: 1 },
            ]
        );
    }
}
