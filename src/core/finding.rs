use serde::{Deserialize, Serialize};

use crate::core::input::RawInput;
use crate::core::types::Severity;

/// Category of a non-fatal problem found while resolving samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A referenced file does not exist
    MissingFile,
    /// A referenced file has zero bytes
    EmptyFile,
    /// Mate files differ in size by more than the fixed threshold
    SizeMismatch,
    /// No rule produced an identity
    Unidentified,
    /// A record was excluded by the length filter
    LengthFiltered,
    /// Two inputs claim the same mate role for one identity
    ConflictingMate,
    /// Only one mate of a pair was found
    IncompletePair,
    /// Several unpaired inputs share one identity
    AmbiguousIdentity,
    /// The custom identity pattern could not be compiled
    InvalidPattern,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::MissingFile => "MISSING_FILE",
            Self::EmptyFile => "EMPTY_FILE",
            Self::SizeMismatch => "SIZE_MISMATCH",
            Self::Unidentified => "UNIDENTIFIED",
            Self::LengthFiltered => "LENGTH_FILTERED",
            Self::ConflictingMate => "CONFLICTING_MATE",
            Self::IncompletePair => "INCOMPLETE_PAIR",
            Self::AmbiguousIdentity => "AMBIGUOUS_IDENTITY",
            Self::InvalidPattern => "INVALID_PATTERN",
        };
        write!(f, "{label}")
    }
}

/// What a finding is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Input(RawInput),
    /// A resolved sample, by identity
    Sample(String),
    /// A configured pattern, by its source text
    Pattern(String),
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(input) => write!(f, "{input}"),
            Self::Sample(identity) => write!(f, "sample {identity}"),
            Self::Pattern(pattern) => write!(f, "pattern '{pattern}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub subject: Subject,
    pub detail: String,
}

impl ValidationFinding {
    pub fn warning(kind: FindingKind, subject: Subject, detail: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            subject,
            detail: detail.into(),
        }
    }

    pub fn info(kind: FindingKind, subject: Subject, detail: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Info,
            subject,
            detail: detail.into(),
        }
    }

    /// The input this finding is about, if it concerns a single input
    #[must_use]
    pub fn input(&self) -> Option<&RawInput> {
        match &self.subject {
            Subject::Input(input) => Some(input),
            _ => None,
        }
    }
}

impl std::fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.detail)
    }
}
