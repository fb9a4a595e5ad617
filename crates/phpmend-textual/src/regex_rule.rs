//! Generic pattern-based file rule
//!
//! A rule is a compiled pattern plus a replacement callback, gated on a
//! fixed set of file names. Every non-overlapping match becomes one edit;
//! a replacement identical to the match produces no edit, which keeps
//! rules idempotent by construction when their pattern cannot match its
//! own replacement.

use phpmend_core::{Edit, FileRule};
use regex::{Captures, Regex};
use std::path::Path;

pub struct RegexFileRule {
    rule_id: &'static str,
    description: &'static str,
    file_names: &'static [&'static str],
    pattern: Regex,
    replacement: fn(&Captures) -> String,
}

impl RegexFileRule {
    pub fn new(
        rule_id: &'static str,
        description: &'static str,
        file_names: &'static [&'static str],
        pattern: Regex,
        replacement: fn(&Captures) -> String,
    ) -> Self {
        Self {
            rule_id,
            description,
            file_names,
            pattern,
            replacement,
        }
    }
}

impl FileRule for RegexFileRule {
    fn rule_id(&self) -> &'static str {
        self.rule_id
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn applies_to(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| {
                self.file_names
                    .iter()
                    .any(|candidate| name.eq_ignore_ascii_case(candidate))
            })
    }

    fn check(&self, source: &str) -> Vec<Edit> {
        let mut edits = Vec::new();

        for caps in self.pattern.captures_iter(source) {
            let Some(matched) = caps.get(0) else {
                continue;
            };
            let replacement = (self.replacement)(&caps);
            if replacement == matched.as_str() {
                continue;
            }
            edits.push(Edit::at_offsets(
                matched.start(),
                matched.end(),
                replacement,
                self.rule_id,
                self.description,
            ));
        }

        edits
    }
}
