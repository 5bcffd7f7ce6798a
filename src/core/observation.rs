use serde::{Deserialize, Serialize};

use crate::core::input::RawInput;
use crate::core::types::MateRole;

/// Result of classifying one raw input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub input: RawInput,

    /// Inferred sample identity; `None` when no rule matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    pub role: MateRole,

    /// Name of the rule that produced the identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Observation {
    pub fn matched(
        input: RawInput,
        identity: impl Into<String>,
        role: MateRole,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            input,
            identity: Some(identity.into()),
            role,
            rule: Some(rule.into()),
        }
    }

    pub fn unmatched(input: RawInput) -> Self {
        Self {
            input,
            identity: None,
            role: MateRole::Unknown,
            rule: None,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.identity.is_some()
    }
}
