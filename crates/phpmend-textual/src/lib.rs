//! phpmend-textual: pattern-based hardening rules for configuration files
//!
//! Available rules:
//! - phpmend:verb-tampering: strip <Limit> blocks from .htaccess
//! - phpmend:ini-display-errors: display_errors = Off in php.ini
//! - phpmend:ini-expose-php: expose_php = Off in php.ini

pub mod ini_hardening;
pub mod regex_rule;
pub mod registry;
pub mod verb_tampering;

pub use regex_rule::RegexFileRule;
pub use registry::{assemble_rules, catalog};
