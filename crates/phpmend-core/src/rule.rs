//! The two rule plugin contracts
//!
//! A structural rule inspects a parsed program; a file rule inspects raw
//! text and gates itself on the file name. Both return span edits tagged
//! with the rule identifier, and both must be idempotent: re-running a
//! rule on its own output yields no further edits.

use mago_syntax::ast::Program;
use std::path::Path;

use crate::edit::Edit;

/// A tree-based security rule
pub trait Rule: Send + Sync {
    /// Globally unique identifier, e.g. "phpmend:weak-prng"
    fn rule_id(&self) -> &'static str;

    /// A short description of what this rule does
    fn description(&self) -> &'static str;

    /// Inspect a parsed file and return the edits to apply.
    ///
    /// A rule that matches nothing returns an empty vector and has no
    /// other effect. Malformed input is "no match", never a panic.
    fn check<'a>(&self, path: &Path, program: &Program<'a>, source: &str) -> Vec<Edit>;
}

/// A pattern-based rule for files that are not parsed as PHP
pub trait FileRule: Send + Sync {
    /// Globally unique identifier, e.g. "phpmend:verb-tampering"
    fn rule_id(&self) -> &'static str;

    /// A short description of what this rule does
    fn description(&self) -> &'static str;

    /// Whether this rule even attempts the given file
    fn applies_to(&self, path: &Path) -> bool;

    /// Inspect raw text and return one edit per match
    fn check(&self, source: &str) -> Vec<Edit>;
}
