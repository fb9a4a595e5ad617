//! Rule: replace broken digest functions with hash('sha256', ...)
//!
//! Single-argument `md5()` and `sha1()` calls are rewritten; the
//! two-argument raw-output form changes the return type and is left alone.

use mago_span::HasSpan;
use mago_syntax::ast::*;
use phpmend_core::{Edit, Rule, Visitor};
use std::path::Path;

pub const RULE_ID: &str = "phpmend:weak-hash";
pub const DESCRIPTION: &str = "Replace md5()/sha1() digests with hash('sha256', ...)";

pub struct WeakHashRule;

impl Rule for WeakHashRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check<'a>(&self, _path: &Path, program: &Program<'a>, source: &str) -> Vec<Edit> {
        let mut visitor = HashVisitor {
            source,
            edits: Vec::new(),
        };
        visitor.visit_program(program, source);
        visitor.edits
    }
}

struct HashVisitor<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl<'a, 's> Visitor<'a> for HashVisitor<'s> {
    fn visit_expression(&mut self, expr: &Expression<'a>, _source: &str) -> bool {
        if let Expression::Call(Call::Function(func_call)) = expr {
            if let Expression::Identifier(ident) = func_call.function {
                let name_span = ident.span();
                let name =
                    &self.source[name_span.start.offset as usize..name_span.end.offset as usize];

                if name.eq_ignore_ascii_case("md5") || name.eq_ignore_ascii_case("sha1") {
                    let args: Vec<_> = func_call.argument_list.arguments.iter().collect();

                    if args.len() == 1 {
                        let arg_span = args[0].span();
                        let arg = &self.source
                            [arg_span.start.offset as usize..arg_span.end.offset as usize];

                        self.edits.push(Edit::new(
                            expr.span(),
                            format!("hash('sha256', {})", arg),
                            RULE_ID,
                            format!("Replace {}() with a SHA-256 digest", name.to_lowercase()),
                        ));
                        return false;
                    }
                }
            }
        }
        true
    }
}
