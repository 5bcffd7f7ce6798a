use serde::{Deserialize, Serialize};

/// Which half of a read pair an input represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MateRole {
    /// Forward read
    R1,
    /// Reverse read
    R2,
    /// Unpaired reads, or a record of a multi-sequence file
    Single,
    /// Matched an identity but carries no role information
    Unknown,
}

impl MateRole {
    /// Interpret a captured role token such as `1`, `R2` or `_R1`.
    ///
    /// Only the trailing digit is significant.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.chars().last() {
            Some('1') => Self::R1,
            Some('2') => Self::R2,
            _ => Self::Unknown,
        }
    }

    /// True for R1 and R2
    #[must_use]
    pub fn is_mate(self) -> bool {
        matches!(self, Self::R1 | Self::R2)
    }
}

impl std::fmt::Display for MateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::R1 => write!(f, "R1"),
            Self::R2 => write!(f, "R2"),
            Self::Single => write!(f, "single"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Sequencing layout of a resolved sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Runtype {
    /// Both mates present
    Paired,
    /// Only unpaired inputs
    Single,
    /// Exactly one mate present
    IncompletePair,
}

impl Runtype {
    /// Label used in sample sheets. Incomplete pairs have no sheet label
    /// of their own and are written as single-end when emitted at all.
    #[must_use]
    pub fn sheet_label(self) -> &'static str {
        match self {
            Self::Paired => "paired-end",
            Self::Single | Self::IncompletePair => "single-end",
        }
    }
}

impl std::fmt::Display for Runtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paired => write!(f, "paired-end"),
            Self::Single => write!(f, "single-end"),
            Self::IncompletePair => write!(f, "incomplete-pair"),
        }
    }
}

/// How loudly a finding should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_token() {
        assert_eq!(MateRole::from_token("1"), MateRole::R1);
        assert_eq!(MateRole::from_token("R2"), MateRole::R2);
        assert_eq!(MateRole::from_token("_r1"), MateRole::R1);
        assert_eq!(MateRole::from_token("R3"), MateRole::Unknown);
        assert_eq!(MateRole::from_token(""), MateRole::Unknown);
    }

    #[test]
    fn test_sheet_labels() {
        assert_eq!(Runtype::Paired.sheet_label(), "paired-end");
        assert_eq!(Runtype::Single.sheet_label(), "single-end");
        assert_eq!(Runtype::IncompletePair.sheet_label(), "single-end");
        assert_eq!(Runtype::IncompletePair.to_string(), "incomplete-pair");
    }
}
