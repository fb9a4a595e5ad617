//! Rule: replace weak pseudo-random generators with random_int()
//!
//! `rand()` and `mt_rand()` are predictable and must not feed anything
//! security-sensitive; `random_int()` draws from the platform CSPRNG with
//! the same two-argument shape.

use mago_span::HasSpan;
use mago_syntax::ast::*;
use phpmend_core::{Edit, Rule, Visitor};
use std::path::Path;

pub const RULE_ID: &str = "phpmend:weak-prng";
pub const DESCRIPTION: &str = "Replace rand()/mt_rand() with the CSPRNG-backed random_int()";

pub struct WeakPrngRule;

impl Rule for WeakPrngRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check<'a>(&self, _path: &Path, program: &Program<'a>, source: &str) -> Vec<Edit> {
        let mut visitor = PrngVisitor {
            source,
            edits: Vec::new(),
        };
        visitor.visit_program(program, source);
        visitor.edits
    }
}

struct PrngVisitor<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl<'a, 's> Visitor<'a> for PrngVisitor<'s> {
    fn visit_expression(&mut self, expr: &Expression<'a>, _source: &str) -> bool {
        if let Expression::Call(Call::Function(func_call)) = expr {
            if let Expression::Identifier(ident) = func_call.function {
                let name_span = ident.span();
                let name =
                    &self.source[name_span.start.offset as usize..name_span.end.offset as usize];

                if name.eq_ignore_ascii_case("rand") || name.eq_ignore_ascii_case("mt_rand") {
                    let args: Vec<_> = func_call.argument_list.arguments.iter().collect();

                    let replacement = match args.len() {
                        0 => Some("random_int(0, PHP_INT_MAX)".to_string()),
                        2 => {
                            let min_span = args[0].span();
                            let max_span = args[1].span();
                            let min = &self.source
                                [min_span.start.offset as usize..min_span.end.offset as usize];
                            let max = &self.source
                                [max_span.start.offset as usize..max_span.end.offset as usize];
                            Some(format!("random_int({}, {})", min, max))
                        }
                        _ => None,
                    };

                    if let Some(replacement) = replacement {
                        self.edits.push(Edit::new(
                            expr.span(),
                            replacement,
                            RULE_ID,
                            format!("Replace {}() with random_int()", name.to_lowercase()),
                        ));
                        return false;
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use mago_database::file::FileId;
    use phpmend_core::apply_edits;

    fn check_php(source: &str) -> Vec<Edit> {
        let arena = Bump::new();
        let file_id = FileId::new("test.php");
        let (program, _) = mago_syntax::parser::parse_file_content(&arena, file_id, source);
        WeakPrngRule.check(Path::new("test.php"), program, source)
    }

    fn transform(source: &str) -> String {
        let edits = check_php(source);
        apply_edits(source, &edits).unwrap()
    }

    #[test]
    fn test_zero_arg_rand() {
        let source = "<?php $token = rand();";
        let edits = check_php(source);
        assert_eq!(edits.len(), 1);
        assert_eq!(transform(source), "<?php $token = random_int(0, PHP_INT_MAX);");
    }

    #[test]
    fn test_zero_arg_mt_rand() {
        let source = "<?php $token = mt_rand();";
        assert_eq!(transform(source), "<?php $token = random_int(0, PHP_INT_MAX);");
    }

    #[test]
    fn test_ranged_rand() {
        let source = "<?php $pin = rand(1000, 9999);";
        assert_eq!(transform(source), "<?php $pin = random_int(1000, 9999);");
    }

    #[test]
    fn test_ranged_mt_rand_with_expressions() {
        let source = "<?php $n = mt_rand($min, $max + 1);";
        assert_eq!(transform(source), "<?php $n = random_int($min, $max + 1);");
    }

    #[test]
    fn test_case_insensitive_callee() {
        let source = "<?php $n = RAND();";
        let edits = check_php(source);
        assert_eq!(edits.len(), 1);
    }

    #[test]
    fn test_skip_one_arg_call() {
        // mt_rand() never takes exactly one argument; leave the bug alone
        let source = "<?php $n = mt_rand($seed);";
        assert_eq!(check_php(source).len(), 0);
    }

    #[test]
    fn test_multiple_sites() {
        let source = "<?php $a = rand(); $b = mt_rand(0, 10); $c = rand();";
        let edits = check_php(source);
        assert_eq!(edits.len(), 3);
    }

    #[test]
    fn test_nested_in_argument() {
        let source = "<?php shuffle_with(rand());";
        let edits = check_php(source);
        assert_eq!(edits.len(), 1);
    }

    #[test]
    fn test_inside_class_method() {
        let source = r#"<?php
class TokenFactory {
    public function make(): int {
        return rand();
    }
}
"#;
        let edits = check_php(source);
        assert_eq!(edits.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let source = "<?php $token = rand(); $pin = mt_rand(0, 9);";
        let woven = transform(source);
        assert_eq!(check_php(&woven).len(), 0);
    }

    #[test]
    fn test_untouched_random_int() {
        let source = "<?php $n = random_int(0, 10);";
        assert_eq!(check_php(source).len(), 0);
    }
}
