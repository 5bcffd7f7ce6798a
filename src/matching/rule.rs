use regex::{Captures, Regex};
use thiserror::Error;

use crate::core::types::MateRole;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid expression for rule '{name}': {source}")]
    InvalidExpression {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate rule name: {0}")]
    DuplicateName(String),
}

/// How a rule derives the mate role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// The rule must capture a `role` group ending in 1 or 2
    MateRoleCapture,
    /// The rule captures an identity only; the role is the rule's default
    /// unless an optional `role` group says otherwise
    IdentityCapture,
}

/// Identity and role extracted by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub identity: String,
    pub role: MateRole,
    pub rule: &'a str,
}

/// A named, prioritized matching rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    pub kind: RuleKind,
    pub expression: Regex,
    /// Lower values are tried first
    pub priority: u32,
    default_role: MateRole,
}

impl PatternRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidExpression` if `expression` is not a valid regex.
    pub fn new(
        name: impl Into<String>,
        kind: RuleKind,
        expression: &str,
        priority: u32,
    ) -> Result<Self, PatternError> {
        let name = name.into();
        let expression = Regex::new(expression).map_err(|source| PatternError::InvalidExpression {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            kind,
            expression,
            priority,
            default_role: MateRole::Unknown,
        })
    }

    /// Role assigned when the rule has no usable `role` capture
    #[must_use]
    pub fn with_default_role(mut self, role: MateRole) -> Self {
        self.default_role = role;
        self
    }

    /// Apply the rule to `text`.
    ///
    /// The identity is the `identity` group if the expression has one, otherwise
    /// capture group 1, otherwise the whole match when the expression has no
    /// groups at all. Empty identities never match.
    pub fn apply(&self, text: &str) -> Option<RuleMatch<'_>> {
        let caps = self.expression.captures(text)?;
        let identity = self.identity_from(&caps)?;
        if identity.is_empty() {
            return None;
        }

        let captured_role = caps
            .name("role")
            .map(|m| MateRole::from_token(m.as_str()))
            .filter(|r| r.is_mate());

        let role = match self.kind {
            RuleKind::MateRoleCapture => captured_role?,
            RuleKind::IdentityCapture => captured_role.unwrap_or(self.default_role),
        };

        Some(RuleMatch {
            identity: identity.to_string(),
            role,
            rule: &self.name,
        })
    }

    fn identity_from<'t>(&self, caps: &Captures<'t>) -> Option<&'t str> {
        let has_named = self
            .expression
            .capture_names()
            .any(|n| n == Some("identity"));
        if has_named {
            return caps.name("identity").map(|m| m.as_str());
        }
        if self.expression.captures_len() > 1 {
            return caps.get(1).map(|m| m.as_str());
        }
        caps.get(0).map(|m| m.as_str())
    }
}
