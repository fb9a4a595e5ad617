//! Include/exclude scoping for candidate files
//!
//! Patterns are globs evaluated against the path relative to the
//! configured root. Includes win unless a matching exclude pattern is
//! strictly longer than the longest matching include pattern.

use glob::Pattern;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("invalid scope pattern `{pattern}`: {source}")]
    BadPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Decides which files participate in scanning.
///
/// Built once per run; a malformed pattern fails construction, before any
/// file is processed.
#[derive(Debug)]
pub struct ScopeFilter {
    root: PathBuf,
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl ScopeFilter {
    pub fn from_patterns(
        root: &Path,
        includes: &[String],
        excludes: &[String],
    ) -> Result<Self, ScopeError> {
        Ok(Self {
            root: root.to_path_buf(),
            includes: compile(includes)?,
            excludes: compile(excludes)?,
        })
    }

    /// Whether this file is in scope.
    ///
    /// A path is in scope iff it matches at least one include pattern (an
    /// empty include list matches everything) and no matching exclude
    /// pattern is more specific than every matching include pattern. Only
    /// the single longest matcher on each side is compared, and a tie goes
    /// to the include side.
    pub fn should_inspect(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let candidate = relative.to_string_lossy();

        let include_len = if self.includes.is_empty() {
            Some(0)
        } else {
            longest_match(&self.includes, &candidate)
        };

        let Some(include_len) = include_len else {
            return false;
        };

        match longest_match(&self.excludes, &candidate) {
            Some(exclude_len) => exclude_len <= include_len,
            None => true,
        }
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, ScopeError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| ScopeError::BadPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Length of the longest pattern matching the candidate, if any
fn longest_match(patterns: &[Pattern], candidate: &str) -> Option<usize> {
    patterns
        .iter()
        .filter(|pattern| pattern.matches(candidate))
        .map(|pattern| pattern.as_str().len())
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(includes: &[&str], excludes: &[&str]) -> ScopeFilter {
        let includes: Vec<String> = includes.iter().map(|s| s.to_string()).collect();
        let excludes: Vec<String> = excludes.iter().map(|s| s.to_string()).collect();
        ScopeFilter::from_patterns(Path::new("/repo"), &includes, &excludes).unwrap()
    }

    #[test]
    fn test_everything_in_scope_with_no_patterns() {
        let scope = filter(&[], &[]);
        assert!(scope.should_inspect(Path::new("/repo/src/index.php")));
        assert!(scope.should_inspect(Path::new("/repo/config/.htaccess")));
    }

    #[test]
    fn test_include_wins_over_shorter_exclude() {
        let scope = filter(&["src/app/**"], &["src/**"]);
        assert!(scope.should_inspect(Path::new("/repo/src/app/Main.php")));
    }

    #[test]
    fn test_longer_exclude_wins() {
        let scope = filter(&["src/**"], &["src/legacy/**"]);
        assert!(!scope.should_inspect(Path::new("/repo/src/legacy/Old.php")));
        assert!(scope.should_inspect(Path::new("/repo/src/current/New.php")));
    }

    #[test]
    fn test_exclude_applies_without_includes() {
        let scope = filter(&[], &["vendor/**"]);
        assert!(!scope.should_inspect(Path::new("/repo/vendor/lib/a.php")));
        assert!(scope.should_inspect(Path::new("/repo/src/a.php")));
    }

    #[test]
    fn test_unmatched_include_drops_path() {
        let scope = filter(&["src/**"], &[]);
        assert!(!scope.should_inspect(Path::new("/repo/tools/build.php")));
    }

    #[test]
    fn test_equal_length_tie_goes_to_include() {
        let scope = filter(&["src/a/**"], &["src/b/**"]);
        assert!(scope.should_inspect(Path::new("/repo/src/a/f.php")));
        assert!(!scope.should_inspect(Path::new("/repo/src/b/f.php")));

        // Same path matched by equally specific include and exclude
        let scope = filter(&["src/**/*.php"], &["src/**/*.ph?"]);
        assert!(scope.should_inspect(Path::new("/repo/src/app/f.php")));
    }

    #[test]
    fn test_paths_evaluated_relative_to_root() {
        let scope = filter(&["src/**"], &[]);
        // The absolute prefix must not count towards pattern matching
        assert!(scope.should_inspect(Path::new("/repo/src/f.php")));
        assert!(!scope.should_inspect(Path::new("/elsewhere/src-not/f.php")));
    }

    #[test]
    fn test_malformed_pattern_is_fatal() {
        let result =
            ScopeFilter::from_patterns(Path::new("/repo"), &["src/[".to_string()], &[]);
        assert!(result.is_err());
    }
}
