//! Rule activation policy
//!
//! A run has one default posture for every rule plus an exception list;
//! a rule named in the exceptions gets the opposite of the default.

use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("unrecognized default rule setting `{0}` (expected `enabled` or `disabled`)")]
    BadDefaultSetting(String),
}

/// The posture applied to every rule not named in the exception list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultRuleSetting {
    #[default]
    Enabled,
    Disabled,
}

impl DefaultRuleSetting {
    /// Parse the raw configuration token
    pub fn parse(token: &str) -> Result<Self, PolicyError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "enabled" => Ok(DefaultRuleSetting::Enabled),
            "disabled" => Ok(DefaultRuleSetting::Disabled),
            _ => Err(PolicyError::BadDefaultSetting(token.to_string())),
        }
    }
}

/// Decides which rules are active for this run.
///
/// Constructed once per run; queries are pure and involve no I/O. Callers
/// that build rule values must consult `is_active` before construction —
/// an inactive rule is never instantiated, since construction may load
/// external analysis input.
#[derive(Debug, Clone)]
pub struct RulePolicy {
    default: DefaultRuleSetting,
    exceptions: HashSet<String>,
}

impl RulePolicy {
    pub fn new(default: DefaultRuleSetting, exceptions: impl IntoIterator<Item = String>) -> Self {
        Self {
            default,
            exceptions: exceptions.into_iter().collect(),
        }
    }

    /// Policy that activates every rule
    pub fn enable_all() -> Self {
        Self::new(DefaultRuleSetting::Enabled, [])
    }

    /// Whether the rule with this identifier runs in this run
    pub fn is_active(&self, rule_id: &str) -> bool {
        match self.default {
            DefaultRuleSetting::Enabled => !self.exceptions.contains(rule_id),
            DefaultRuleSetting::Disabled => self.exceptions.contains(rule_id),
        }
    }
}
