//! Policy-gated assembly of the textual rule catalog

use phpmend_core::{FileRule, RulePolicy};

use crate::ini_hardening::{self, display_errors_rule, expose_php_rule};
use crate::verb_tampering;

/// All rule identifiers with their descriptions, in registration order
pub fn catalog() -> Vec<(&'static str, &'static str)> {
    vec![
        (verb_tampering::RULE_ID, verb_tampering::DESCRIPTION),
        (
            ini_hardening::DISPLAY_ERRORS_RULE_ID,
            ini_hardening::DISPLAY_ERRORS_DESCRIPTION,
        ),
        (
            ini_hardening::EXPOSE_PHP_RULE_ID,
            ini_hardening::EXPOSE_PHP_DESCRIPTION,
        ),
    ]
}

/// Build the active textual rules for this run, in the order the weaver
/// will run them
pub fn assemble_rules(policy: &RulePolicy) -> Vec<Box<dyn FileRule>> {
    let mut rules: Vec<Box<dyn FileRule>> = Vec::new();

    if policy.is_active(verb_tampering::RULE_ID) {
        rules.push(Box::new(verb_tampering::rule()));
    }
    if policy.is_active(ini_hardening::DISPLAY_ERRORS_RULE_ID) {
        rules.push(Box::new(display_errors_rule()));
    }
    if policy.is_active(ini_hardening::EXPOSE_PHP_RULE_ID) {
        rules.push(Box::new(expose_php_rule()));
    }

    rules
}
