use serde::{Deserialize, Serialize};

use crate::core::finding::{FindingKind, Subject, ValidationFinding};
use crate::core::input::RawInput;

/// Optional inclusive bounds on record length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl LengthFilter {
    pub fn new(min_length: Option<u64>, max_length: Option<u64>) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    /// Why a length is rejected, or `None` if it passes
    fn rejection(&self, length: u64) -> Option<String> {
        match (self.min_length, self.max_length) {
            (Some(min), _) if length < min => Some(format!("length {length} < minimum {min}")),
            (_, Some(max)) if length > max => Some(format!("length {length} > maximum {max}")),
            _ => None,
        }
    }

    /// Split records into those kept and a `LengthFiltered` finding for each
    /// excluded one. Inputs without a length (files) always pass.
    pub fn apply(&self, inputs: Vec<RawInput>) -> (Vec<RawInput>, Vec<ValidationFinding>) {
        if !self.is_active() {
            return (inputs, Vec::new());
        }

        let mut kept = Vec::with_capacity(inputs.len());
        let mut findings = Vec::new();
        for input in inputs {
            match input.length().and_then(|len| self.rejection(len)) {
                Some(reason) => {
                    let detail = format!("{} excluded: {reason}", input.label());
                    findings.push(ValidationFinding::info(
                        FindingKind::LengthFiltered,
                        Subject::Input(input),
                        detail,
                    ));
                }
                None => kept.push(input),
            }
        }
        (kept, findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(lengths: &[u64]) -> Vec<RawInput> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, len)| RawInput::from_record(format!("ctg{i} S1_1"), "in.fa", i, *len))
            .collect()
    }

    #[test]
    fn test_inactive_filter_keeps_everything() {
        let (kept, findings) = LengthFilter::default().apply(records(&[1, 2, 3]));
        assert_eq!(kept.len(), 3);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = LengthFilter::new(Some(200), Some(1000));
        let (kept, findings) = filter.apply(records(&[199, 200, 1000, 1001]));
        let kept_lengths: Vec<u64> = kept.iter().filter_map(RawInput::length).collect();
        assert_eq!(kept_lengths, vec![200, 1000]);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.kind == FindingKind::LengthFiltered));
        assert!(findings[0].detail.contains("ctg0"));
        assert!(findings[0].detail.contains("199"));
        assert!(findings[1].detail.contains("1001"));
    }

    #[test]
    fn test_files_pass_through() {
        let filter = LengthFilter::new(Some(10), None);
        let (kept, findings) = filter.apply(vec![RawInput::from_path("A_R1.fq")]);
        assert_eq!(kept.len(), 1);
        assert!(findings.is_empty());
    }
}
