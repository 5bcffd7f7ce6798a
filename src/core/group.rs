use serde::{Deserialize, Serialize};

use crate::core::input::RawInput;
use crate::core::types::Runtype;

/// All inputs resolved to one sample identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub identity: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r1: Option<RawInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r2: Option<RawInput>,

    /// Unpaired inputs in scan order (contigs, for isolate groups)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub singles: Vec<RawInput>,

    pub runtype: Runtype,
}

impl SampleGroup {
    /// Assemble a group, deriving the runtype from which members are present.
    pub fn new(
        identity: impl Into<String>,
        r1: Option<RawInput>,
        r2: Option<RawInput>,
        singles: Vec<RawInput>,
    ) -> Self {
        let runtype = match (&r1, &r2) {
            (Some(_), Some(_)) => Runtype::Paired,
            (Some(_), None) | (None, Some(_)) => Runtype::IncompletePair,
            (None, None) => Runtype::Single,
        };
        Self {
            identity: identity.into(),
            r1,
            r2,
            singles,
            runtype,
        }
    }

    /// Every input referenced by this group, mates first.
    pub fn members(&self) -> impl Iterator<Item = &RawInput> {
        self.r1
            .iter()
            .chain(self.r2.iter())
            .chain(self.singles.iter())
    }

    /// The single mate of an incomplete pair
    #[must_use]
    pub fn lone_mate(&self) -> Option<&RawInput> {
        match (&self.r1, &self.r2) {
            (Some(m), None) | (None, Some(m)) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
