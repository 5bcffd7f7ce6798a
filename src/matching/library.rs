use std::collections::HashSet;

use tracing::debug;

use crate::core::input::RawInput;
use crate::core::observation::Observation;
use crate::core::types::MateRole;
use crate::matching::rule::{PatternError, PatternRule, RuleKind, RuleMatch};

/// Name given to the caller-supplied identity rule
pub const CUSTOM_RULE_NAME: &str = "custom";

/// What kind of text a library classifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    /// FASTQ file names
    Reads,
    /// FASTA record headers
    Isolates,
}

/// An ordered set of named rules. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    kind: LibraryKind,
    /// Always tried before `rules`
    custom: Option<PatternRule>,
    /// Sorted by priority; equal priorities keep declaration order
    rules: Vec<PatternRule>,
}

/// FASTQ file name conventions, in priority order.
///
/// | Rule | Example |
/// |------|---------|
/// | `underscore_r` | `S1_R1.fastq.gz`, `S1_R2_001.fq` |
/// | `underscore_digit` | `S1_1.fastq.gz` |
/// | `dot_r` | `S1.R2.fq.gz` |
/// | `generic_split` | `S1_R1_trimmed.fastq` (first `_R?[12]` token) |
/// | `single_end` | `S1.fastq.gz` |
const READS_RULES: &[(&str, RuleKind, &str)] = &[
    (
        "underscore_r",
        RuleKind::MateRoleCapture,
        r"(?i)^(?P<identity>.+)_(?P<role>R[12])(?:_\d+)?\.f(?:ast)?q(?:\.gz)?$",
    ),
    (
        "underscore_digit",
        RuleKind::MateRoleCapture,
        r"(?i)^(?P<identity>.+)_(?P<role>[12])\.f(?:ast)?q(?:\.gz)?$",
    ),
    (
        "dot_r",
        RuleKind::MateRoleCapture,
        r"(?i)^(?P<identity>.+)\.(?P<role>R[12])\.f(?:ast)?q(?:\.gz)?$",
    ),
    (
        "generic_split",
        RuleKind::MateRoleCapture,
        r"(?i)^(?P<identity>.+?)_(?P<role>R?[12])",
    ),
    (
        "single_end",
        RuleKind::IdentityCapture,
        r"(?i)^(?P<identity>.+?)\.f(?:ast)?q(?:\.gz)?$",
    ),
];

/// FASTA header conventions for isolate identifiers, in priority order.
const ISOLATE_RULES: &[(&str, RuleKind, &str)] = &[
    ("standard", RuleKind::IdentityCapture, r"(S\d+_\d+|N\d+_\d+|T\d+_\d+)"),
    ("extended", RuleKind::IdentityCapture, r"([A-Z]+\d+_\d+)"),
    ("simple", RuleKind::IdentityCapture, r"([A-Z]\d+)"),
    ("keyword", RuleKind::IdentityCapture, r"(?i)(isolado[_\-]?\d+|sample[_\-]?\d+)"),
    ("generic", RuleKind::IdentityCapture, r"([A-Za-z]+\d+)"),
];

const PRIORITY_STEP: u32 = 10;

impl PatternLibrary {
    /// Create an empty library
    pub fn new(kind: LibraryKind) -> Self {
        Self {
            kind,
            custom: None,
            rules: Vec::new(),
        }
    }

    /// Default rules for FASTQ file names.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if a built-in rule fails to compile.
    pub fn reads_defaults() -> Result<Self, PatternError> {
        Self::from_table(LibraryKind::Reads, READS_RULES)
    }

    /// Default rules for isolate identifiers in FASTA headers.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if a built-in rule fails to compile.
    pub fn isolate_defaults() -> Result<Self, PatternError> {
        Self::from_table(LibraryKind::Isolates, ISOLATE_RULES)
    }

    /// Defaults for the given kind
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if a built-in rule fails to compile.
    pub fn defaults(kind: LibraryKind) -> Result<Self, PatternError> {
        match kind {
            LibraryKind::Reads => Self::reads_defaults(),
            LibraryKind::Isolates => Self::isolate_defaults(),
        }
    }

    fn from_table(
        kind: LibraryKind,
        table: &[(&str, RuleKind, &str)],
    ) -> Result<Self, PatternError> {
        let mut library = Self::new(kind);
        let mut priority = 0;
        for (name, rule_kind, expression) in table {
            priority += PRIORITY_STEP;
            // Identity-only defaults describe unpaired files or isolate records
            let rule = PatternRule::new(*name, *rule_kind, expression, priority)?
                .with_default_role(MateRole::Single);
            library.add_rule(rule)?;
        }
        Ok(library)
    }

    #[must_use]
    pub fn kind(&self) -> LibraryKind {
        self.kind
    }

    /// Add a rule, keeping the library in priority order.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::DuplicateName` if a rule with the same name exists.
    pub fn add_rule(&mut self, rule: PatternRule) -> Result<(), PatternError> {
        if rule.name == CUSTOM_RULE_NAME || self.rules.iter().any(|r| r.name == rule.name) {
            return Err(PatternError::DuplicateName(rule.name));
        }
        self.rules.push(rule);
        // Stable sort: ties stay in declaration order
        self.rules.sort_by_key(|r| r.priority);
        Ok(())
    }

    /// Install a caller-supplied identity pattern that is tried before every
    /// default rule.
    ///
    /// A FASTQ pattern without a `role` group only overrides the identity; the
    /// mate role comes from the first default rule matching the same name.
    ///
    /// On failure the library is left unchanged, so scanning can continue with
    /// the default rules.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidExpression` if `pattern` does not compile.
    pub fn set_custom_pattern(&mut self, pattern: &str) -> Result<(), PatternError> {
        // Custom FASTQ patterns only carry a role when they capture one
        let role = match self.kind {
            LibraryKind::Reads => MateRole::Unknown,
            LibraryKind::Isolates => MateRole::Single,
        };
        let rule = PatternRule::new(CUSTOM_RULE_NAME, RuleKind::IdentityCapture, pattern, 0)?
            .with_default_role(role);
        self.custom = Some(rule);
        Ok(())
    }

    #[must_use]
    pub fn has_custom_pattern(&self) -> bool {
        self.custom.is_some()
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.custom.iter().chain(self.rules.iter())
    }

    /// Rule names in evaluation order
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules().map(|r| r.name.as_str()).collect()
    }

    /// Apply rules in order and return the first match.
    pub fn match_text(&self, text: &str) -> Option<RuleMatch<'_>> {
        if let Some(mut m) = self.custom.as_ref().and_then(|rule| rule.apply(text)) {
            if m.role == MateRole::Unknown {
                if let Some(role) = self.default_role_for(text) {
                    m.role = role;
                }
            }
            return Some(m);
        }
        self.rules.iter().find_map(|rule| rule.apply(text))
    }

    fn default_role_for(&self, text: &str) -> Option<MateRole> {
        self.rules.iter().find_map(|rule| rule.apply(text)).map(|m| m.role)
    }

    /// Classify one input into an observation.
    pub fn classify(&self, input: RawInput) -> Observation {
        match self.match_text(&input.text) {
            Some(m) => {
                debug!("Rule '{}' matched '{}' -> {} ({})", m.rule, input.text, m.identity, m.role);
                Observation::matched(input, m.identity, m.role, m.rule)
            }
            None => {
                debug!("No rule matched '{}'", input.text);
                Observation::unmatched(input)
            }
        }
    }

    /// Check the library invariant that rule names are unique.
    #[must_use]
    pub fn names_are_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.rules().all(|r| seen.insert(r.name.as_str()))
    }
}
