//! Policy-gated assembly of the structural rule catalog
//!
//! Rules are registered in one fixed order, and the policy is consulted
//! before each rule value is constructed: an inactive rule is never
//! instantiated. That matters for the analysis-seeded rule, whose
//! constructor reads external result files.

use phpmend_core::{Rule, RulePolicy};
use std::path::PathBuf;

use crate::analysis::{AnalysisError, AnalysisFindings};
use crate::echo_escape::{self, EchoEscapeRule};
use crate::ssl_verify::{self, SslVerifyRule};
use crate::unserialize::{self, UnserializeRule};
use crate::weak_hash::{self, WeakHashRule};
use crate::weak_prng::{self, WeakPrngRule};

/// All rule identifiers with their descriptions, in registration order
pub fn catalog() -> Vec<(&'static str, &'static str)> {
    vec![
        (weak_prng::RULE_ID, weak_prng::DESCRIPTION),
        (weak_hash::RULE_ID, weak_hash::DESCRIPTION),
        (unserialize::RULE_ID, unserialize::DESCRIPTION),
        (ssl_verify::RULE_ID, ssl_verify::DESCRIPTION),
        (echo_escape::RULE_ID, echo_escape::DESCRIPTION),
    ]
}

/// Build the active rules for this run, in the order the weaver will run
/// them. `analysis_paths` are only read when the rule consuming them is
/// active.
pub fn assemble_rules(
    policy: &RulePolicy,
    analysis_paths: &[PathBuf],
) -> Result<Vec<Box<dyn Rule>>, AnalysisError> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();

    if policy.is_active(weak_prng::RULE_ID) {
        rules.push(Box::new(WeakPrngRule));
    }
    if policy.is_active(weak_hash::RULE_ID) {
        rules.push(Box::new(WeakHashRule));
    }
    if policy.is_active(unserialize::RULE_ID) {
        rules.push(Box::new(UnserializeRule));
    }
    if policy.is_active(ssl_verify::RULE_ID) {
        rules.push(Box::new(SslVerifyRule));
    }
    if policy.is_active(echo_escape::RULE_ID) {
        let findings = AnalysisFindings::load(analysis_paths)?;
        rules.push(Box::new(EchoEscapeRule::new(findings)));
    }

    Ok(rules)
}
