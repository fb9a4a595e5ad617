//! Rule: escape echoed output at analysis-flagged sites
//!
//! A taint analysis tool reports the echo statements that emit
//! user-controlled data; each echoed value at a flagged line is wrapped in
//! htmlspecialchars(). The rule only exists when findings were supplied,
//! so it is constructed from them rather than configured afterwards.

use mago_span::HasSpan;
use mago_syntax::ast::*;
use phpmend_core::{offset_to_line, Edit, Rule, Visitor};
use std::collections::BTreeSet;
use std::path::Path;

use crate::analysis::AnalysisFindings;

pub const RULE_ID: &str = "phpmend:echo-escape";
pub const DESCRIPTION: &str = "Wrap analysis-flagged echo output in htmlspecialchars()";

pub struct EchoEscapeRule {
    findings: AnalysisFindings,
}

impl EchoEscapeRule {
    pub fn new(findings: AnalysisFindings) -> Self {
        Self { findings }
    }
}

impl Rule for EchoEscapeRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check<'a>(&self, path: &Path, program: &Program<'a>, source: &str) -> Vec<Edit> {
        let flagged = self.findings.lines_for(path);
        if flagged.is_empty() {
            return Vec::new();
        }

        let mut visitor = EchoVisitor {
            source,
            flagged,
            edits: Vec::new(),
        };
        visitor.visit_program(program, source);
        visitor.edits
    }
}

struct EchoVisitor<'s> {
    source: &'s str,
    flagged: BTreeSet<usize>,
    edits: Vec<Edit>,
}

impl<'a, 's> Visitor<'a> for EchoVisitor<'s> {
    fn visit_statement(&mut self, stmt: &Statement<'a>, _source: &str) -> bool {
        if let Statement::Echo(echo) = stmt {
            for value in echo.values.iter() {
                let span = value.span();
                let line = offset_to_line(self.source, span.start.offset as usize);
                if !self.flagged.contains(&line) {
                    continue;
                }
                if is_escaped(value, self.source) {
                    continue;
                }

                let code = &self.source[span.start.offset as usize..span.end.offset as usize];
                self.edits.push(Edit::new(
                    span,
                    format!("htmlspecialchars({})", code),
                    RULE_ID,
                    "Escape echoed output",
                ));
            }
            return false;
        }
        true
    }
}

/// Whether the value is already an htmlspecialchars() call
fn is_escaped(value: &Expression<'_>, source: &str) -> bool {
    if let Expression::Call(Call::Function(func_call)) = value {
        if let Expression::Identifier(ident) = func_call.function {
            let span = ident.span();
            let name = &source[span.start.offset as usize..span.end.offset as usize];
            return name.eq_ignore_ascii_case("htmlspecialchars");
        }
    }
    false
}
