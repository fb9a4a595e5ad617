//! Rule: forbid object instantiation through unserialize()
//!
//! `unserialize($data)` on attacker-controlled input is a PHP object
//! injection gadget; pinning `allowed_classes` to false keeps the payload
//! data-only. Calls that already pass an options array are left alone.

use mago_span::HasSpan;
use mago_syntax::ast::*;
use phpmend_core::{Edit, Rule, Visitor};
use std::path::Path;

pub const RULE_ID: &str = "phpmend:unsafe-unserialize";
pub const DESCRIPTION: &str = "Constrain unserialize() with ['allowed_classes' => false]";

pub struct UnserializeRule;

impl Rule for UnserializeRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check<'a>(&self, _path: &Path, program: &Program<'a>, source: &str) -> Vec<Edit> {
        let mut visitor = UnserializeVisitor {
            source,
            edits: Vec::new(),
        };
        visitor.visit_program(program, source);
        visitor.edits
    }
}

struct UnserializeVisitor<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl<'a, 's> Visitor<'a> for UnserializeVisitor<'s> {
    fn visit_expression(&mut self, expr: &Expression<'a>, _source: &str) -> bool {
        if let Expression::Call(Call::Function(func_call)) = expr {
            if let Expression::Identifier(ident) = func_call.function {
                let name_span = ident.span();
                let name =
                    &self.source[name_span.start.offset as usize..name_span.end.offset as usize];

                if name.eq_ignore_ascii_case("unserialize") {
                    let args: Vec<_> = func_call.argument_list.arguments.iter().collect();

                    if args.len() == 1 {
                        let arg_span = args[0].span();
                        let arg = &self.source
                            [arg_span.start.offset as usize..arg_span.end.offset as usize];

                        self.edits.push(Edit::new(
                            expr.span(),
                            format!("unserialize({}, ['allowed_classes' => false])", arg),
                            RULE_ID,
                            "Disallow object instantiation during unserialize()",
                        ));
                        return false;
                    }
                }
            }
        }
        true
    }
}
