//! Rule: remove HTTP method filtering from .htaccess
//!
//! `<Limit GET POST>` blocks only guard the verbs they name; any request
//! with an unlisted verb sails past the access control. Removing the block
//! makes the enclosed directives unconditional.

use regex::Regex;

use crate::regex_rule::RegexFileRule;

pub const RULE_ID: &str = "phpmend:verb-tampering";
pub const DESCRIPTION: &str = "Remove <Limit> HTTP method filtering from .htaccess";

pub fn rule() -> RegexFileRule {
    RegexFileRule::new(
        RULE_ID,
        DESCRIPTION,
        &[".htaccess"],
        Regex::new(r"(?is)<Limit\s[^>]*>.*?</Limit>[ \t]*\r?\n?").unwrap(),
        |_| String::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpmend_core::{apply_edits, FileRule};

    fn transform(source: &str) -> String {
        let rule = rule();
        let edits = rule.check(source);
        apply_edits(source, &edits).unwrap()
    }

    #[test]
    fn test_limit_block_removed() {
        let source = "Options -Indexes\n<Limit GET POST>\nRequire valid-user\n</Limit>\nDirectoryIndex index.php\n";
        assert_eq!(
            transform(source),
            "Options -Indexes\nDirectoryIndex index.php\n"
        );
    }

    #[test]
    fn test_multiple_blocks_removed() {
        let source = "<Limit GET>\nDeny from all\n</Limit>\nkeep\n<Limit POST PUT>\nDeny from all\n</Limit>\n";
        let rule = rule();
        assert_eq!(rule.check(source).len(), 2);
        assert_eq!(transform(source), "keep\n");
    }

    #[test]
    fn test_case_insensitive_tags() {
        let source = "<limit get>\ndeny from all\n</LIMIT>\n";
        assert_eq!(transform(source), "");
    }

    #[test]
    fn test_untouched_htaccess() {
        let source = "Options -Indexes\nRequire valid-user\n";
        assert!(rule().check(source).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let source = "<Limit GET>\nDeny from all\n</Limit>\n";
        let woven = transform(source);
        assert!(rule().check(&woven).is_empty());
    }
}
