//! Rule: re-enable TLS peer verification on curl handles
//!
//! `curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, false)` turns a TLS channel
//! into a cleartext one for any on-path attacker. Only the third argument
//! is rewritten, and only when it is a falsy literal.

use mago_span::HasSpan;
use mago_syntax::ast::*;
use phpmend_core::{Edit, Rule, Visitor};
use std::path::Path;

pub const RULE_ID: &str = "phpmend:ssl-peer-verification";
pub const DESCRIPTION: &str = "Re-enable CURLOPT_SSL_VERIFYPEER on curl handles";

pub struct SslVerifyRule;

impl Rule for SslVerifyRule {
    fn rule_id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check<'a>(&self, _path: &Path, program: &Program<'a>, source: &str) -> Vec<Edit> {
        let mut visitor = SslVerifyVisitor {
            source,
            edits: Vec::new(),
        };
        visitor.visit_program(program, source);
        visitor.edits
    }
}

struct SslVerifyVisitor<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl<'a, 's> Visitor<'a> for SslVerifyVisitor<'s> {
    fn visit_expression(&mut self, expr: &Expression<'a>, _source: &str) -> bool {
        if let Expression::Call(Call::Function(func_call)) = expr {
            if let Expression::Identifier(ident) = func_call.function {
                let name_span = ident.span();
                let name =
                    &self.source[name_span.start.offset as usize..name_span.end.offset as usize];

                if name.eq_ignore_ascii_case("curl_setopt") {
                    let args: Vec<_> = func_call.argument_list.arguments.iter().collect();

                    if args.len() == 3 {
                        let option_span = args[1].span();
                        let option = &self.source
                            [option_span.start.offset as usize..option_span.end.offset as usize];
                        let value_span = args[2].span();
                        let value = self.source
                            [value_span.start.offset as usize..value_span.end.offset as usize]
                            .trim();

                        if option.trim() == "CURLOPT_SSL_VERIFYPEER" && is_falsy_literal(value) {
                            self.edits.push(Edit::new(
                                value_span,
                                "true",
                                RULE_ID,
                                "Restore TLS peer verification",
                            ));
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

fn is_falsy_literal(value: &str) -> bool {
    value.eq_ignore_ascii_case("false") || value == "0"
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
        SslVerifyRule.check(Path::new("test.php"), program, source)
    }

    fn transform(source: &str) -> String {
        let edits = check_php(source);
        apply_edits(source, &edits).unwrap()
    }

    #[test]
    fn test_disabled_verification_restored() {
        let source = "<?php curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, false);";
        assert_eq!(
            transform(source),
            "<?php curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, true);"
        );
    }

    #[test]
    fn test_zero_literal() {
        let source = "<?php curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, 0);";
        assert_eq!(
            transform(source),
            "<?php curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, true);"
        );
    }

    #[test]
    fn test_skip_other_options() {
        let source = "<?php curl_setopt($ch, CURLOPT_TIMEOUT, 0);";
        assert_eq!(check_php(source).len(), 0);
    }

    #[test]
    fn test_skip_enabled_verification() {
        let source = "<?php curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, true);";
        assert_eq!(check_php(source).len(), 0);
    }

    #[test]
    fn test_skip_dynamic_value() {
        // Not provably falsy; leave it for a human
        let source = "<?php curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, $verify);";
        assert_eq!(check_php(source).len(), 0);
    }

    #[test]
    fn test_idempotent() {
        let source = "<?php curl_setopt($ch, CURLOPT_SSL_VERIFYPEER, false);";
        let woven = transform(source);
        assert_eq!(check_php(&woven).len(), 0);
    }
}
