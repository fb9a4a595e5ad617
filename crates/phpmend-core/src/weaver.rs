//! The structural and textual weaving passes
//!
//! `SourceWeaver` parses each in-scope PHP file once and runs every
//! structural rule against that single parsed representation;
//! `FileWeaver` runs pattern rules against the raw text of the remaining
//! files, composing on top of whatever the structural pass already
//! rewrote. Both record outcomes as a `WeavingResult`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use mago_database::file::FileId;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::edit::{apply_edits, Edit};
use crate::rule::{FileRule, Rule};
use crate::weave::{offset_to_line, ChangedFile, UnscannableFile, Weave, WeavingResult};

/// Per-file claim tracker.
///
/// Rules run sequentially in registration order against one parsed file;
/// each accepted edit claims its span, and a later edit overlapping an
/// already-claimed span is rejected. Two rules can therefore never rewrite
/// the same syntactic site, and the surviving edit set is conflict-free.
#[derive(Default)]
pub struct FileWeavingContext {
    accepted: Vec<Edit>,
}

impl FileWeavingContext {
    fn new() -> Self {
        Self::default()
    }

    /// Claim the edit's span. Returns `false` if the span is already taken.
    fn claim(&mut self, edit: Edit) -> bool {
        let start = edit.start_offset();
        let end = edit.end_offset();
        let taken = self
            .accepted
            .iter()
            .any(|prior| start < prior.end_offset() && prior.start_offset() < end);
        if taken {
            return false;
        }
        self.accepted.push(edit);
        true
    }

    fn into_edits(self) -> Vec<Edit> {
        self.accepted
    }
}

/// Outcome of weaving a single file
enum FileOutcome {
    Unchanged,
    Changed(ChangedFile),
    Unscannable(UnscannableFile),
}

fn collect_outcomes(outcomes: Vec<FileOutcome>) -> WeavingResult {
    let mut result = WeavingResult::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Unchanged => {}
            FileOutcome::Changed(file) => result.add_changed(file),
            FileOutcome::Unscannable(file) => result.mark_unscannable(file),
        }
    }
    result
}

/// Run the rules against one file's content, rejecting double-claims and
/// demoting panicking rules to "no match".
fn gather_edits(
    path: &Path,
    rules_in_order: impl Iterator<Item = (&'static str, Vec<Edit>)>,
) -> Vec<Edit> {
    let mut context = FileWeavingContext::new();
    for (rule_id, edits) in rules_in_order {
        for edit in edits {
            if !context.claim(edit) {
                debug!(
                    rule = rule_id,
                    path = %path.display(),
                    "edit rejected: site already claimed by an earlier rule"
                );
            }
        }
    }
    context.into_edits()
}

/// Render the accepted edits and build the per-file outcome
fn finish_file(path: &Path, source: &str, mut edits: Vec<Edit>) -> FileOutcome {
    if edits.is_empty() {
        return FileOutcome::Unchanged;
    }

    let new_content = match apply_edits(source, &edits) {
        Ok(content) => content,
        Err(e) => {
            return FileOutcome::Unscannable(UnscannableFile::new(
                path,
                format!("could not render edits: {e}"),
            ));
        }
    };

    edits.sort_by_key(|edit| edit.start_offset());
    let weaves = edits
        .iter()
        .map(|edit| {
            Weave::from(edit.rule, offset_to_line(source, edit.start_offset()))
                .with_description(edit.message.clone())
        })
        .collect();

    FileOutcome::Changed(ChangedFile {
        path: path.to_path_buf(),
        weaves,
        new_content,
    })
}

/// The structural pass: one parse per file, every rule against that parse
pub struct SourceWeaver;

impl SourceWeaver {
    /// Weave every eligible candidate file. Files are processed in
    /// parallel; within one file, rules run strictly in registration
    /// order. Files without a `php` extension are left to the textual
    /// pass.
    pub fn weave(files: &[PathBuf], rules: &[Box<dyn Rule>]) -> WeavingResult {
        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .filter(|path| is_php_source(path))
            .map(|path| Self::weave_file(path, rules))
            .collect();
        collect_outcomes(outcomes)
    }

    fn weave_file(path: &Path, rules: &[Box<dyn Rule>]) -> FileOutcome {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                return FileOutcome::Unscannable(UnscannableFile::new(
                    path,
                    format!("could not read file: {e}"),
                ));
            }
        };

        let arena = Bump::new();
        let file_id = FileId::new(path.to_string_lossy().as_ref());
        let (program, parse_error) =
            mago_syntax::parser::parse_file_content(&arena, file_id, &source);

        if parse_error.is_some() {
            return FileOutcome::Unscannable(UnscannableFile::new(
                path,
                "failed to parse PHP source",
            ));
        }

        debug!(path = %path.display(), rules = rules.len(), "weaving parsed file");

        let per_rule = rules.iter().map(|rule| {
            let edits = catch_unwind(AssertUnwindSafe(|| rule.check(path, program, &source)))
                .unwrap_or_else(|_| {
                    warn!(
                        rule = rule.rule_id(),
                        path = %path.display(),
                        "rule panicked; treating as no match"
                    );
                    Vec::new()
                });
            (rule.rule_id(), edits)
        });

        finish_file(path, &source, gather_edits(path, per_rule))
    }
}

/// The textual pass: pattern rules over raw file content
pub struct FileWeaver;

impl FileWeaver {
    /// Weave every candidate file some rule's predicate accepts, taking as
    /// current content whatever the structural pass already produced for
    /// that file. Files the structural pass could not scan are skipped.
    pub fn weave(
        files: &[PathBuf],
        rules: &[Box<dyn FileRule>],
        structural: &WeavingResult,
    ) -> WeavingResult {
        let mut result = WeavingResult::new();

        for path in files {
            if structural.is_unscannable(path) {
                continue;
            }

            let applicable: Vec<&dyn FileRule> = rules
                .iter()
                .filter(|rule| rule.applies_to(path))
                .map(|rule| rule.as_ref())
                .collect();
            if applicable.is_empty() {
                continue;
            }

            let current = match structural.changed_content(path) {
                Some(content) => content.to_string(),
                None => match std::fs::read_to_string(path) {
                    Ok(content) => content,
                    Err(e) => {
                        result.mark_unscannable(UnscannableFile::new(
                            path,
                            format!("could not read file: {e}"),
                        ));
                        continue;
                    }
                },
            };

            debug!(path = %path.display(), rules = applicable.len(), "weaving file content");

            let per_rule = applicable.iter().map(|rule| {
                let edits = catch_unwind(AssertUnwindSafe(|| rule.check(&current)))
                    .unwrap_or_else(|_| {
                        warn!(
                            rule = rule.rule_id(),
                            path = %path.display(),
                            "rule panicked; treating as no match"
                        );
                        Vec::new()
                    });
                (rule.rule_id(), edits)
            });

            match finish_file(path, &current, gather_edits(path, per_rule)) {
                FileOutcome::Unchanged => {}
                FileOutcome::Changed(file) => result.add_changed(file),
                FileOutcome::Unscannable(file) => result.mark_unscannable(file),
            }
        }

        result
    }
}

fn is_php_source(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("php"))
}
