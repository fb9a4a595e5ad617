//! Terminal output formatting

use colored::*;
use phpmend_core::WeavingResult;
use std::time::Duration;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Print the merged weaving result for humans
pub fn print_result(result: &WeavingResult, fix_mode: bool, elapsed: Duration) {
    for file in result.changed_files() {
        let verb = if fix_mode { "fixed" } else { "would fix" };
        println!("{} {}", verb.green().bold(), file.path.display());
        for weave in &file.weaves {
            match &weave.description {
                Some(description) => {
                    println!("  line {}: {} - {}", weave.line, weave.rule.cyan(), description)
                }
                None => println!("  line {}: {}", weave.line, weave.rule.cyan()),
            }
        }
    }

    for file in result.unscannable_files() {
        println!(
            "{} {}: {}",
            "unscannable".yellow().bold(),
            file.path.display(),
            file.reason
        );
    }

    println!();
    println!(
        "{} file(s) changed, {} weave(s), {} unscannable, {} ms",
        result.changed_count(),
        result.total_weaves(),
        result.unscannable_count(),
        elapsed.as_millis()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }
}
