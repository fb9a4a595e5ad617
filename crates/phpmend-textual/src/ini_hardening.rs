//! Rules: harden php.ini runtime directives
//!
//! Production php.ini files must not leak diagnostics (`display_errors`,
//! `display_startup_errors`) or advertise the interpreter version
//! (`expose_php`).

use regex::Regex;

use crate::regex_rule::RegexFileRule;

pub const DISPLAY_ERRORS_RULE_ID: &str = "phpmend:ini-display-errors";
pub const DISPLAY_ERRORS_DESCRIPTION: &str = "Turn off display_errors in php.ini";

pub const EXPOSE_PHP_RULE_ID: &str = "phpmend:ini-expose-php";
pub const EXPOSE_PHP_DESCRIPTION: &str = "Turn off expose_php in php.ini";

pub fn display_errors_rule() -> RegexFileRule {
    RegexFileRule::new(
        DISPLAY_ERRORS_RULE_ID,
        DISPLAY_ERRORS_DESCRIPTION,
        &["php.ini"],
        Regex::new(r"(?im)^([ \t]*display(?:_startup)?_errors[ \t]*=[ \t]*)(?:on|1|true)[ \t]*$")
            .unwrap(),
        |caps| format!("{}Off", &caps[1]),
    )
}

pub fn expose_php_rule() -> RegexFileRule {
    RegexFileRule::new(
        EXPOSE_PHP_RULE_ID,
        EXPOSE_PHP_DESCRIPTION,
        &["php.ini"],
        Regex::new(r"(?im)^([ \t]*expose_php[ \t]*=[ \t]*)(?:on|1|true)[ \t]*$").unwrap(),
        |caps| format!("{}Off", &caps[1]),
    )
}
